//! Multi-module builds.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use remold_core::{BatchFailure, BatchReport};
use tracing::{info, warn};

use crate::error::MavenError;
use crate::pom::RawPom;
use crate::resolver::{MavenResolutionResult, MavenResolver};

/// The project POMs of one build.
#[derive(Debug, Default)]
pub struct Reactor {
    modules: Vec<Arc<RawPom>>,
    failures: Vec<BatchFailure<MavenError>>,
}

impl Reactor {
    /// Reads `root/pom.xml` and follows `<modules>` breadth first.
    ///
    /// Only an unreadable root POM is fatal; broken module POMs are reported
    /// by [`Reactor::resolve`].
    pub fn load(root: &Path) -> Result<Reactor, MavenError> {
        let root = canonicalize_or_fallback(root);
        let root_pom = RawPom::load(&root.join("pom.xml"))?;

        let mut reactor = Reactor::default();
        let mut visited: HashSet<PathBuf> = HashSet::new();
        visited.insert(root.clone());

        let mut queue: VecDeque<PathBuf> = VecDeque::new();
        let mut modules = root_pom.modules.clone();
        modules.sort();
        for module in modules {
            queue.push_back(root.join(module));
        }
        reactor.modules.push(Arc::new(root_pom));

        while let Some(module_root) = queue.pop_front() {
            let module_root = canonicalize_or_fallback(&module_root);
            if !visited.insert(module_root.clone()) {
                continue;
            }
            let pom_path = module_root.join("pom.xml");
            if !pom_path.is_file() {
                warn!(target: "remold.maven", path = %pom_path.display(), "module without pom.xml");
                continue;
            }
            match RawPom::load(&pom_path) {
                Ok(pom) => {
                    let mut children = pom.modules.clone();
                    children.sort();
                    for child in children {
                        queue.push_back(module_root.join(child));
                    }
                    reactor.modules.push(Arc::new(pom));
                }
                Err(error) => reactor.failures.push(BatchFailure {
                    unit: pom_path.display().to_string(),
                    error,
                }),
            }
        }

        info!(
            target: "remold.maven",
            root = %root.display(),
            modules = reactor.modules.len(),
            failures = reactor.failures.len(),
            "loaded reactor"
        );
        Ok(reactor)
    }

    /// A reactor over in-memory documents, keyed by their (virtual) path.
    pub fn from_documents<P, S>(documents: impl IntoIterator<Item = (P, S)>) -> Reactor
    where
        P: Into<PathBuf>,
        S: AsRef<str>,
    {
        let mut reactor = Reactor::default();
        for (path, text) in documents {
            let path = path.into();
            let location = path.display().to_string();
            match RawPom::parse_str(text.as_ref(), &location) {
                Ok(mut pom) => {
                    pom.source_path = Some(path);
                    reactor.modules.push(Arc::new(pom));
                }
                Err(error) => reactor.failures.push(BatchFailure {
                    unit: location,
                    error,
                }),
            }
        }
        reactor
    }

    pub fn modules(&self) -> &[Arc<RawPom>] {
        &self.modules
    }

    /// Resolves every module in parallel. Sibling modules are visible as
    /// project POMs; one failing module never affects the others.
    pub fn resolve(self, resolver: &MavenResolver) -> BatchReport<MavenResolutionResult, MavenError> {
        let resolver = resolver.with_project_poms(self.modules.iter().cloned());
        let results: Vec<(String, Result<MavenResolutionResult, MavenError>)> = self
            .modules
            .par_iter()
            .map(|pom| (unit_name(pom), resolver.resolve(pom.clone())))
            .collect();

        let mut report = BatchReport::new();
        for failure in self.failures {
            report.push(failure.unit, Err(failure.error));
        }
        for (unit, result) in results {
            if let Err(error) = &result {
                warn!(target: "remold.maven", module = %unit, %error, "module resolution failed");
            }
            report.push(unit, result);
        }
        report
    }
}

fn unit_name(pom: &RawPom) -> String {
    match &pom.source_path {
        Some(path) => path.display().to_string(),
        None => pom.artifact_id.clone(),
    }
}

fn canonicalize_or_fallback(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
