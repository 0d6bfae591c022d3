//! Transitive dependency expansion for one scope.

use std::collections::{HashSet, VecDeque};
use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::coordinates::{Exclusion, Gav, Scope};
use crate::error::DependencyResolutionError;
use crate::pom::Dependency;
use crate::repository::RepositoryDescriptor;
use crate::resolver::{MavenResolver, ResolvedPom};
use crate::version::VersionRequirement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub gav: Gav,
    /// `timestamp-buildNumber` form of a snapshot version, when known.
    pub dated_snapshot_version: Option<String>,
    pub classifier: Option<String>,
    pub type_: String,
    pub scope: Scope,
    pub optional: bool,
    pub exclusions: Vec<Exclusion>,
    pub children: Vec<ResolvedDependency>,
    /// 0 for direct dependencies.
    pub depth: usize,
    /// The declaration this node was resolved from, after management.
    pub requested: Dependency,
}

struct Pending {
    parent: Option<usize>,
    declaration: Dependency,
    scope: Scope,
    depth: usize,
    /// Own exclusions plus everything inherited from ancestors.
    exclusions: Vec<Exclusion>,
    /// Root repositories plus those declared along the path.
    repositories: Arc<Vec<RepositoryDescriptor>>,
}

struct Node {
    dependency: ResolvedDependency,
    children: Vec<usize>,
}

/// Breadth-first expansion of `root`'s dependencies in the `scope`
/// partition. The first occurrence of a `group:artifact:type[:classifier]` wins.
pub(crate) fn resolve_forest(
    resolver: &MavenResolver,
    root: &Arc<ResolvedPom>,
    scope: Scope,
    errors: &mut Vec<DependencyResolutionError>,
) -> Vec<ResolvedDependency> {
    let root_repositories = Arc::new(root.repositories.clone());
    let mut queue = VecDeque::new();
    for dependency in &root.dependencies {
        let Some(declared) = Scope::parse(dependency.scope.as_deref()) else {
            warn!(
                target: "remold.maven",
                coordinate = %dependency.coordinate(),
                scope = dependency.scope.as_deref().unwrap_or_default(),
                "unknown dependency scope"
            );
            continue;
        };
        if !declared.is_in_partition(scope) {
            continue;
        }
        queue.push_back(Pending {
            parent: None,
            declaration: dependency.clone(),
            scope: declared,
            depth: 0,
            exclusions: dependency.exclusions.clone(),
            repositories: root_repositories.clone(),
        });
    }

    let mut seen = HashSet::new();
    let mut nodes: Vec<Node> = Vec::new();
    let mut roots = Vec::new();
    while let Some(pending) = queue.pop_front() {
        if !seen.insert(pending.declaration.key()) {
            debug!(
                target: "remold.maven",
                coordinate = %pending.declaration.coordinate(),
                "omitted for conflict"
            );
            continue;
        }
        let coordinate = pending.declaration.coordinate();
        let version = match select_version(resolver, &pending.declaration, &pending.repositories) {
            Ok(version) => version,
            Err(message) => {
                warn!(target: "remold.maven", %coordinate, %message, "dependency resolution failed");
                errors.push(DependencyResolutionError::new(coordinate, message));
                continue;
            }
        };
        let gav = Gav::new(
            &pending.declaration.group_id,
            &pending.declaration.artifact_id,
            version,
        );
        let dated_snapshot_version = resolver.dated_snapshot(&gav, &pending.repositories);

        // System scope and `*:*` exclusions end the branch.
        let expand = pending.scope != Scope::System
            && !pending
                .exclusions
                .iter()
                .any(|e| e.group_id == "*" && e.artifact_id == "*");
        let pom = if expand {
            match resolver.dependency_pom(&gav, &pending.repositories) {
                Ok(pom) => Some(pom),
                Err(err) => {
                    warn!(target: "remold.maven", coordinate = %gav, error = %err, "dependency resolution failed");
                    errors.push(DependencyResolutionError::new(gav.to_string(), err));
                    continue;
                }
            }
        } else {
            None
        };

        let index = nodes.len();
        nodes.push(Node {
            dependency: ResolvedDependency {
                gav: gav.clone(),
                dated_snapshot_version,
                classifier: pending.declaration.classifier.clone(),
                type_: pending.declaration.type_or_default().to_owned(),
                scope: pending.scope,
                optional: pending.declaration.optional,
                exclusions: pending.declaration.exclusions.clone(),
                children: Vec::new(),
                depth: pending.depth,
                requested: pending.declaration.clone(),
            },
            children: Vec::new(),
        });
        match pending.parent {
            Some(parent) => nodes[parent].children.push(index),
            None => roots.push(index),
        }

        let Some(pom) = pom else {
            continue;
        };
        let repositories = if pom.repositories.is_empty() {
            pending.repositories.clone()
        } else {
            let mut merged = (*pending.repositories).clone();
            for repository in &pom.repositories {
                if !merged.iter().any(|known| known.id == repository.id) {
                    merged.push(repository.clone());
                }
            }
            Arc::new(merged)
        };
        for declared in &pom.dependencies {
            if declared.optional {
                continue;
            }
            // Selection looks at the scope the dependency POM declares.
            let Some(declared_scope) = Scope::parse(declared.scope.as_deref()) else {
                continue;
            };
            if !declared_scope.is_inherited() {
                continue;
            }
            let mut child = declared.clone();
            if let Some(managed) = root.managed(&child.key()) {
                override_from_management(&mut child, managed);
            }
            let child_scope = match Scope::parse(child.scope.as_deref()) {
                Some(Scope::Import) | None => declared_scope,
                Some(managed) => managed,
            };
            let effective = pending.scope.derive(child_scope);
            if !effective.is_in_partition(scope) {
                continue;
            }
            if pending
                .exclusions
                .iter()
                .any(|e| e.matches(&child.group_id, &child.artifact_id))
            {
                debug!(target: "remold.maven", coordinate = %child.coordinate(), "excluded");
                continue;
            }
            let mut exclusions = pending.exclusions.clone();
            for exclusion in &child.exclusions {
                if !exclusions.contains(exclusion) {
                    exclusions.push(exclusion.clone());
                }
            }
            queue.push_back(Pending {
                parent: Some(index),
                declaration: child,
                scope: effective,
                depth: pending.depth + 1,
                exclusions,
                repositories: repositories.clone(),
            });
        }
    }

    roots.into_iter().map(|index| assemble(&nodes, index)).collect()
}

/// The root's management wins over what a dependency POM declares.
fn override_from_management(dependency: &mut Dependency, managed: &Dependency) {
    if managed.version.is_some() {
        dependency.version = managed.version.clone();
    }
    if managed.scope.is_some() {
        dependency.scope = managed.scope.clone();
    }
    for exclusion in &managed.exclusions {
        if !dependency.exclusions.contains(exclusion) {
            dependency.exclusions.push(exclusion.clone());
        }
    }
}

fn select_version(
    resolver: &MavenResolver,
    dependency: &Dependency,
    repositories: &[RepositoryDescriptor],
) -> Result<String, String> {
    let Some(requested) = dependency.version.as_deref().filter(|v| !v.trim().is_empty()) else {
        return Err("no version declared or managed".to_owned());
    };
    if requested.contains("${") {
        return Err(format!("unresolved property in version {requested}"));
    }
    let requirement = VersionRequirement::parse(requested);
    if !requirement.needs_metadata() {
        return Ok(requested.trim().to_owned());
    }
    let metadata = resolver
        .metadata(&dependency.group_artifact(), None, repositories)
        .unwrap_or_default();
    requirement
        .select(metadata.versions.iter().map(String::as_str))
        .ok_or_else(|| format!("no available version matches {requested}"))
}

fn assemble(nodes: &[Node], index: usize) -> ResolvedDependency {
    let node = &nodes[index];
    let mut dependency = node.dependency.clone();
    dependency.children = node
        .children
        .iter()
        .map(|&child| assemble(nodes, child))
        .collect();
    dependency
}

/// One `group:artifact:version[:classifier]` line per node, indented one
/// space per level. Siblings are sorted; optional nodes are left out.
pub fn print_dependency_tree(dependencies: &[ResolvedDependency]) -> String {
    let mut out = String::new();
    print_level(dependencies, 0, &mut out);
    out
}

fn print_level(dependencies: &[ResolvedDependency], indent: usize, out: &mut String) {
    let mut sorted: Vec<&ResolvedDependency> = dependencies.iter().filter(|d| !d.optional).collect();
    sorted.sort_by(|a, b| {
        (&a.gav.group_id, &a.gav.artifact_id).cmp(&(&b.gav.group_id, &b.gav.artifact_id))
    });
    for dependency in sorted {
        let _ = write!(
            out,
            "{:indent$}{}:{}:{}",
            "",
            dependency.gav.group_id,
            dependency.gav.artifact_id,
            dependency.gav.version
        );
        if let Some(classifier) = &dependency.classifier {
            out.push(':');
            out.push_str(classifier);
        }
        out.push('\n');
        print_level(&dependency.children, indent + 1, out);
    }
}
