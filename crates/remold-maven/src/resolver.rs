//! Effective models: parent chain, profiles, properties and dependency
//! management, then the per-scope dependency forests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::cache::PomCache;
use crate::coordinates::{Gav, GroupArtifact, Scope};
use crate::error::{DependencyResolutionError, MavenError};
use crate::graph::{self, ResolvedDependency};
use crate::interpolate::Interpolator;
use crate::metadata::MavenMetadata;
use crate::options::ResolverOptions;
use crate::pom::{Dependency, DependencyKey, Parent, Profile, RawPom};
use crate::profile::ActivationContext;
use crate::repository::{
    artifact_path, ArtifactRepository, HttpRepository, LocalRepository, RepositoryDescriptor,
};
use crate::settings::{apply_credentials, apply_mirrors};

pub const MAX_PARENT_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResolutionStage {
    RawParsed,
    ParentResolved,
    PropertiesInterpolated,
    ManagementMerged,
    DependenciesResolved,
}

/// The effective model of one POM.
#[derive(Debug, Clone)]
pub struct ResolvedPom {
    pub requested: Arc<RawPom>,
    /// Nearest parent first.
    pub parents: Vec<Arc<RawPom>>,
    pub gav: Gav,
    pub packaging: String,
    /// Model properties of the whole chain, child over parent, uninterpolated.
    pub properties: BTreeMap<String, String>,
    pub dependency_management: IndexMap<DependencyKey, Dependency>,
    /// Own dependencies first, then inherited ones; versions and scopes
    /// filled from management.
    pub dependencies: Vec<Dependency>,
    pub repositories: Vec<RepositoryDescriptor>,
    pub active_profiles: Vec<String>,
    pub stage: ResolutionStage,
}

impl ResolvedPom {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn managed(&self, key: &DependencyKey) -> Option<&Dependency> {
        self.dependency_management.get(key)
    }

    /// Managed version of a classifier-less `group:artifact` jar.
    pub fn managed_version(&self, group_id: &str, artifact_id: &str) -> Option<&str> {
        self.managed(&DependencyKey {
            group_id: group_id.to_owned(),
            artifact_id: artifact_id.to_owned(),
            type_: "jar".to_owned(),
            classifier: None,
        })
        .and_then(|dependency| dependency.version.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct MavenResolutionResult {
    pub pom: Arc<ResolvedPom>,
    pub dependencies: BTreeMap<Scope, Vec<ResolvedDependency>>,
    pub errors: Vec<DependencyResolutionError>,
    pub stage: ResolutionStage,
}

impl MavenResolutionResult {
    pub fn dependencies(&self, scope: Scope) -> &[ResolvedDependency] {
        self.dependencies.get(&scope).map_or(&[], Vec::as_slice)
    }

    /// Depth-first search of one scope forest.
    pub fn find(&self, scope: Scope, group_id: &str, artifact_id: &str) -> Option<&ResolvedDependency> {
        fn search<'a>(
            nodes: &'a [ResolvedDependency],
            group_id: &str,
            artifact_id: &str,
        ) -> Option<&'a ResolvedDependency> {
            nodes.iter().find_map(|node| {
                if node.gav.group_id == group_id && node.gav.artifact_id == artifact_id {
                    Some(node)
                } else {
                    search(&node.children, group_id, artifact_id)
                }
            })
        }
        search(self.dependencies(scope), group_id, artifact_id)
    }
}

#[derive(Default)]
struct ProjectPoms {
    by_path: HashMap<PathBuf, Arc<RawPom>>,
    by_ga: HashMap<GroupArtifact, Arc<RawPom>>,
}

impl ProjectPoms {
    fn matching(&self, gav: &Gav) -> Option<&Arc<RawPom>> {
        let pom = self.by_ga.get(&gav.group_artifact())?;
        version_matches(pom, &gav.version).then_some(pom)
    }
}

/// A version still holding a placeholder (`${revision}`) matches anything.
fn version_matches(pom: &RawPom, version: &str) -> bool {
    match pom.effective_version() {
        Some(own) if !own.contains("${") && !version.contains("${") => own == version,
        _ => true,
    }
}

/// Resolves POMs against project POMs and repositories.
///
/// Clones share the caches and connected repositories.
#[derive(Clone)]
pub struct MavenResolver {
    options: Arc<ResolverOptions>,
    cache: Arc<PomCache>,
    local: Option<Arc<dyn ArtifactRepository>>,
    extra: Vec<Arc<dyn ArtifactRepository>>,
    connected: Arc<RwLock<HashMap<String, Arc<dyn ArtifactRepository>>>>,
    projects: Arc<ProjectPoms>,
}

impl MavenResolver {
    pub fn new(options: ResolverOptions) -> Self {
        let local = options
            .local_repository
            .as_ref()
            .map(|root| Arc::new(LocalRepository::new(root.clone())) as Arc<dyn ArtifactRepository>);
        Self {
            options: Arc::new(options),
            cache: Arc::new(PomCache::new()),
            local,
            extra: Vec::new(),
            connected: Arc::default(),
            projects: Arc::default(),
        }
    }

    /// Consulted after the local repository and before any POM-declared one.
    pub fn with_repository(mut self, repository: Arc<dyn ArtifactRepository>) -> Self {
        self.extra.push(repository);
        self
    }

    /// A resolver that also sees `poms` as project POMs.
    pub fn with_project_poms(&self, poms: impl IntoIterator<Item = Arc<RawPom>>) -> Self {
        let mut projects = ProjectPoms {
            by_path: self.projects.by_path.clone(),
            by_ga: self.projects.by_ga.clone(),
        };
        for pom in poms {
            if let Some(path) = &pom.source_path {
                projects.by_path.insert(normalize_path(path), pom.clone());
            }
            if let Some(ga) = pom.group_artifact() {
                projects.by_ga.insert(ga, pom);
            }
        }
        Self {
            projects: Arc::new(projects),
            ..self.clone()
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn cache(&self) -> &PomCache {
        &self.cache
    }

    /// Effective model of `pom`, up to [`ResolutionStage::ManagementMerged`].
    pub fn resolve_pom(&self, pom: impl Into<Arc<RawPom>>) -> Result<Arc<ResolvedPom>, MavenError> {
        self.resolve_model(pom.into(), &mut Vec::new()).map(Arc::new)
    }

    /// Effective model plus one dependency forest per scope.
    ///
    /// Only model failures are fatal; unresolvable dependencies are
    /// collected in [`MavenResolutionResult::errors`].
    pub fn resolve(&self, pom: impl Into<Arc<RawPom>>) -> Result<MavenResolutionResult, MavenError> {
        let pom = self.resolve_pom(pom)?;
        let mut dependencies = BTreeMap::new();
        let mut errors: Vec<DependencyResolutionError> = Vec::new();
        for scope in Scope::RESOLVED {
            let mut scope_errors = Vec::new();
            dependencies.insert(scope, graph::resolve_forest(self, &pom, scope, &mut scope_errors));
            for error in scope_errors {
                if !errors.contains(&error) {
                    errors.push(error);
                }
            }
        }
        info!(
            target: "remold.maven",
            coordinate = %pom.gav,
            direct = pom.dependencies.len(),
            errors = errors.len(),
            "resolved dependencies"
        );
        Ok(MavenResolutionResult {
            pom,
            dependencies,
            errors,
            stage: ResolutionStage::DependenciesResolved,
        })
    }

    fn resolve_model(&self, pom: Arc<RawPom>, imports: &mut Vec<String>) -> Result<ResolvedPom, MavenError> {
        let coordinate = pom.coordinate();
        debug!(target: "remold.maven", %coordinate, stage = ?ResolutionStage::RawParsed, "resolving model");

        let parents = self.resolve_parents(&pom)?;
        debug!(
            target: "remold.maven",
            %coordinate,
            stage = ?ResolutionStage::ParentResolved,
            parents = parents.len()
        );

        let chain: Vec<&RawPom> = std::iter::once(&*pom)
            .chain(parents.iter().map(|parent| &**parent))
            .collect();
        let activation = ActivationContext {
            explicit: &self.options.active_profiles,
            jdk_version: self.options.jdk_version.as_deref(),
            properties: &self.options.properties,
            environment: &self.options.environment,
        };
        let profiles: Vec<Vec<&Profile>> = chain.iter().map(|raw| activation.active(&raw.profiles)).collect();
        let active_profiles: Vec<String> = profiles
            .iter()
            .flatten()
            .filter_map(|profile| profile.id.clone())
            .collect();

        // Farthest ancestor first so nearer values overwrite.
        let mut properties = BTreeMap::new();
        for (raw, active) in chain.iter().zip(&profiles).rev() {
            properties.extend(raw.properties.clone());
            for profile in active {
                properties.extend(profile.properties.clone());
            }
        }
        let interpolator = Interpolator {
            overrides: &self.options.properties,
            reserved: reserved_properties(&pom),
            environment: &self.options.environment,
            model: &properties,
        };

        let gav = Gav::new(
            interpolator.interpolate(pom.effective_group_id().unwrap_or_default()),
            interpolator.interpolate(&pom.artifact_id),
            interpolator.interpolate(pom.effective_version().unwrap_or_default()),
        );
        let packaging = interpolator.interpolate(pom.packaging.as_deref().unwrap_or("jar"));

        let mut repositories: Vec<RepositoryDescriptor> = Vec::new();
        for (raw, active) in chain.iter().zip(&profiles) {
            let declared = active
                .iter()
                .flat_map(|profile| &profile.repositories)
                .chain(&raw.repositories);
            for repository in declared {
                if repositories.iter().any(|known| known.id == repository.id) {
                    continue;
                }
                repositories.push(RepositoryDescriptor {
                    url: interpolator.interpolate(&repository.url),
                    ..repository.clone()
                });
            }
        }
        debug!(target: "remold.maven", coordinate = %gav, stage = ?ResolutionStage::PropertiesInterpolated);

        let key = gav.to_string();
        if imports.contains(&key) {
            let mut chain = imports.clone();
            chain.push(key);
            return Err(MavenError::ImportCycle { chain });
        }
        imports.push(key);
        let management = self.merge_management(&chain, &profiles, &interpolator, &repositories, imports);
        imports.pop();
        let management = management?;

        let mut dependencies = Vec::new();
        let mut seen = HashSet::new();
        for (raw, active) in chain.iter().zip(&profiles) {
            let declared = active
                .iter()
                .flat_map(|profile| &profile.dependencies)
                .chain(&raw.dependencies);
            for declared in declared {
                let mut dependency = interpolator.dependency(declared);
                if !seen.insert(dependency.key()) {
                    continue;
                }
                if let Some(managed) = management.get(&dependency.key()) {
                    fill_from_management(&mut dependency, managed);
                }
                dependencies.push(dependency);
            }
        }
        debug!(
            target: "remold.maven",
            coordinate = %gav,
            stage = ?ResolutionStage::ManagementMerged,
            managed = management.len(),
            dependencies = dependencies.len()
        );

        Ok(ResolvedPom {
            requested: pom.clone(),
            parents,
            gav,
            packaging,
            properties,
            dependency_management: management,
            dependencies,
            repositories,
            active_profiles,
            stage: ResolutionStage::ManagementMerged,
        })
    }

    fn resolve_parents(&self, pom: &Arc<RawPom>) -> Result<Vec<Arc<RawPom>>, MavenError> {
        let mut parents: Vec<Arc<RawPom>> = Vec::new();
        let mut visited = vec![pom.coordinate()];
        let mut current = pom.clone();
        while let Some(parent) = current.parent.clone() {
            let gav = parent.gav();
            if visited.contains(&gav.to_string()) {
                visited.push(gav.to_string());
                return Err(MavenError::ParentCycle { chain: visited });
            }
            if parents.len() >= MAX_PARENT_DEPTH {
                return Err(MavenError::ParentDepthExceeded {
                    coordinate: pom.coordinate(),
                    max: MAX_PARENT_DEPTH,
                });
            }
            visited.push(gav.to_string());

            let descriptors: Vec<RepositoryDescriptor> = std::iter::once(pom)
                .chain(&parents)
                .flat_map(|raw| raw.repositories.iter().cloned())
                .collect();
            let found = self
                .find_parent(&current, &parent, &descriptors)
                .map_err(|source| MavenError::ParentResolution {
                    coordinate: current.coordinate(),
                    parent: gav.to_string(),
                    source: Box::new(source),
                })?;
            parents.push(found.clone());
            current = found;
        }
        Ok(parents)
    }

    /// relativePath first (project POMs, then disk), then repositories.
    fn find_parent(
        &self,
        child: &RawPom,
        parent: &Parent,
        descriptors: &[RepositoryDescriptor],
    ) -> Result<Arc<RawPom>, MavenError> {
        if let Some(path) = relative_parent_path(child, parent) {
            if let Some(project) = self.projects.by_path.get(&path) {
                if is_parent(project, parent) {
                    return Ok(project.clone());
                }
            } else if path.is_file() {
                let candidate = RawPom::load(&path)?;
                if is_parent(&candidate, parent) {
                    return Ok(Arc::new(candidate));
                }
            }
            debug!(
                target: "remold.maven",
                path = %path.display(),
                parent = %parent.gav(),
                "relative parent path does not match; using repositories"
            );
        }
        self.fetch_pom(&parent.gav(), descriptors)
    }

    fn merge_management(
        &self,
        chain: &[&RawPom],
        profiles: &[Vec<&Profile>],
        interpolator: &Interpolator<'_>,
        repositories: &[RepositoryDescriptor],
        imports: &mut Vec<String>,
    ) -> Result<IndexMap<DependencyKey, Dependency>, MavenError> {
        let mut management = IndexMap::new();
        let mut boms = Vec::new();
        for (raw, active) in chain.iter().zip(profiles) {
            let declared = active
                .iter()
                .flat_map(|profile| &profile.dependency_management)
                .chain(&raw.dependency_management);
            for declared in declared {
                let dependency = interpolator.dependency(declared);
                if dependency.is_bom_import() {
                    boms.push(dependency);
                } else {
                    management.entry(dependency.key()).or_insert(dependency);
                }
            }
        }

        for bom in boms {
            let Some(version) = bom.version.clone() else {
                warn!(target: "remold.maven", bom = %bom.coordinate(), "BOM import without a version");
                continue;
            };
            let gav = Gav::new(&bom.group_id, &bom.artifact_id, version);
            let imported = self.resolve_import(&gav, repositories, imports)?;
            for (key, dependency) in &imported.dependency_management {
                management
                    .entry(key.clone())
                    .or_insert_with(|| dependency.clone());
            }
        }
        Ok(management)
    }

    fn resolve_import(
        &self,
        gav: &Gav,
        repositories: &[RepositoryDescriptor],
        imports: &mut Vec<String>,
    ) -> Result<Arc<ResolvedPom>, MavenError> {
        if let Some(cached) = self.cache.resolved(gav) {
            debug!(target: "remold.maven", bom = %gav, "resolved model cache hit");
            return Ok(cached);
        }
        let raw = self.fetch_pom(gav, repositories)?;
        let resolved = self.resolve_model(raw, imports)?;
        Ok(self.cache.put_resolved(gav.clone(), Arc::new(resolved)))
    }

    /// Effective model of a dependency POM, cached by coordinate.
    pub(crate) fn dependency_pom(
        &self,
        gav: &Gav,
        repositories: &[RepositoryDescriptor],
    ) -> Result<Arc<ResolvedPom>, MavenError> {
        if let Some(cached) = self.cache.resolved(gav) {
            return Ok(cached);
        }
        let raw = self.fetch_pom(gav, repositories)?;
        let resolved = self.resolve_model(raw, &mut Vec::new())?;
        Ok(self.cache.put_resolved(gav.clone(), Arc::new(resolved)))
    }

    /// Project POMs first, then every applicable repository in order.
    pub(crate) fn fetch_pom(
        &self,
        gav: &Gav,
        descriptors: &[RepositoryDescriptor],
    ) -> Result<Arc<RawPom>, MavenError> {
        if let Some(project) = self.projects.matching(gav) {
            debug!(target: "remold.maven", coordinate = %gav, "using project pom");
            return Ok(project.clone());
        }

        let mut file_versions = Vec::new();
        if let Some(dated) = self.dated_snapshot(gav, descriptors) {
            file_versions.push(dated);
        }
        if !file_versions.contains(&gav.version) {
            file_versions.push(gav.version.clone());
        }

        let mut searched = Vec::new();
        let mut failure = None;
        for repository in self.repositories_for(descriptors, Some(&gav.version)) {
            searched.push(repository.id().to_owned());
            for file_version in &file_versions {
                let key = (repository.url().to_owned(), gav.clone(), file_version.clone());
                if let Some(cached) = self.cache.pom(&key) {
                    debug!(target: "remold.maven", coordinate = %gav, repository = repository.id(), "pom cache hit");
                    match cached {
                        Some(pom) => return Ok(pom),
                        None => continue,
                    }
                }
                match repository.pom(gav, file_version) {
                    Ok(Some(bytes)) => {
                        let location = format!(
                            "{}/{}",
                            repository.url(),
                            artifact_path(gav, file_version, None, "pom")
                        );
                        let pom = Arc::new(RawPom::parse_bytes(&bytes, &location)?);
                        self.cache.put_pom(key, Some(pom.clone()));
                        return Ok(pom);
                    }
                    Ok(None) => self.cache.put_pom(key, None),
                    Err(err) => {
                        warn!(
                            target: "remold.maven",
                            coordinate = %gav,
                            repository = repository.id(),
                            error = %err,
                            "pom download failed"
                        );
                        failure.get_or_insert(err);
                        break;
                    }
                }
            }
        }

        let coordinate = gav.to_string();
        match failure {
            Some(source) => Err(MavenError::Repository { coordinate, source }),
            None => Err(MavenError::PomNotFound {
                coordinate,
                repositories: searched,
            }),
        }
    }

    /// Metadata merged over every applicable repository. Per-repository
    /// failures are logged and skipped.
    pub(crate) fn metadata(
        &self,
        ga: &GroupArtifact,
        version: Option<&str>,
        descriptors: &[RepositoryDescriptor],
    ) -> Option<MavenMetadata> {
        let mut merged: Option<MavenMetadata> = None;
        for repository in self.repositories_for(descriptors, version) {
            let key = (repository.url().to_owned(), ga.clone(), version.map(str::to_owned));
            let found = match self.cache.metadata(&key) {
                Some(cached) => cached,
                None => match repository.metadata(ga, version) {
                    Ok(found) => {
                        self.cache.put_metadata(key, found.clone());
                        found
                    }
                    Err(err) => {
                        warn!(
                            target: "remold.maven",
                            artifact = %ga,
                            repository = repository.id(),
                            error = %err,
                            "metadata download failed"
                        );
                        None
                    }
                },
            };
            if let Some(found) = found {
                match merged.as_mut() {
                    Some(merged) => merged.merge(found),
                    None => merged = Some(found),
                }
            }
        }
        merged
    }

    /// `timestamp-buildNumber` version of a snapshot; pinned versions win.
    pub(crate) fn dated_snapshot(&self, gav: &Gav, descriptors: &[RepositoryDescriptor]) -> Option<String> {
        if !gav.is_snapshot() {
            return None;
        }
        if let Some(pinned) = self.options.pinned_snapshot(gav) {
            return Some(pinned.to_owned());
        }
        let metadata = self.metadata(&gav.group_artifact(), Some(&gav.version), descriptors)?;
        metadata
            .snapshot
            .map(|snapshot| snapshot.dated_version(&gav.version))
    }

    /// Local repository, explicit repositories, then `descriptors` and the
    /// configured ones with mirrors and credentials applied. Deduplicated by
    /// url; filtered by release/snapshot policy when `version` is given.
    fn repositories_for(
        &self,
        descriptors: &[RepositoryDescriptor],
        version: Option<&str>,
    ) -> Vec<Arc<dyn ArtifactRepository>> {
        let accepts = |repository: &Arc<dyn ArtifactRepository>| {
            version.map_or(true, |version| repository.accepts(version))
        };
        let mut repositories: Vec<Arc<dyn ArtifactRepository>> = self
            .local
            .iter()
            .chain(&self.extra)
            .filter(|repository| accepts(repository))
            .cloned()
            .collect();
        let mut urls: HashSet<String> = repositories
            .iter()
            .map(|repository| repository.url().to_owned())
            .collect();

        for descriptor in descriptors.iter().chain(&self.options.repositories) {
            let descriptor = apply_credentials(
                &self.options.credentials,
                apply_mirrors(&self.options.mirrors, descriptor.clone()),
            );
            if version.is_some_and(|version| !descriptor.accepts(version)) {
                continue;
            }
            if !urls.insert(descriptor.url.trim_end_matches('/').to_owned()) {
                continue;
            }
            if let Some(repository) = self.connect(&descriptor) {
                repositories.push(repository);
            }
        }
        repositories
    }

    fn connect(&self, descriptor: &RepositoryDescriptor) -> Option<Arc<dyn ArtifactRepository>> {
        let url = descriptor.url.trim_end_matches('/').to_owned();
        if let Some(connected) = self.connected.read().get(&url) {
            return Some(connected.clone());
        }
        let repository: Arc<dyn ArtifactRepository> = if let Some(path) = url.strip_prefix("file://") {
            Arc::new(LocalRepository::from_descriptor(descriptor, PathBuf::from(path)))
        } else if url.starts_with("http://") || url.starts_with("https://") {
            if self.options.offline {
                debug!(target: "remold.maven", repository = %descriptor.id, "offline; skipping remote repository");
                return None;
            }
            Arc::new(HttpRepository::new(
                descriptor,
                self.options.connect_timeout,
                self.options.read_timeout,
            ))
        } else {
            warn!(target: "remold.maven", repository = %descriptor.id, %url, "unsupported repository url");
            return None;
        };
        Some(self.connected.write().entry(url).or_insert(repository).clone())
    }
}

/// Managed values fill what the declaration leaves out.
fn fill_from_management(dependency: &mut Dependency, managed: &Dependency) {
    if dependency.version.is_none() {
        dependency.version = managed.version.clone();
    }
    if dependency.scope.is_none() {
        dependency.scope = managed.scope.clone();
    }
    for exclusion in &managed.exclusions {
        if !dependency.exclusions.contains(exclusion) {
            dependency.exclusions.push(exclusion.clone());
        }
    }
}

fn reserved_properties(pom: &RawPom) -> BTreeMap<String, String> {
    let mut reserved = BTreeMap::new();
    let mut put = |key: &str, value: &str| {
        reserved.insert(format!("project.{key}"), value.to_owned());
        reserved.insert(format!("pom.{key}"), value.to_owned());
    };
    if let Some(group_id) = pom.effective_group_id() {
        put("groupId", group_id);
    }
    put("artifactId", &pom.artifact_id);
    if let Some(version) = pom.effective_version() {
        put("version", version);
    }
    put("packaging", pom.packaging.as_deref().unwrap_or("jar"));
    if let Some(name) = &pom.name {
        put("name", name);
    }
    if let Some(parent) = &pom.parent {
        put("parent.groupId", &parent.group_id);
        put("parent.artifactId", &parent.artifact_id);
        put("parent.version", &parent.version);
    }
    if let Some(dir) = pom.source_path.as_deref().and_then(Path::parent) {
        put("basedir", &dir.display().to_string());
    }
    reserved
}

fn relative_parent_path(child: &RawPom, parent: &Parent) -> Option<PathBuf> {
    let relative = parent.relative_path.as_deref().unwrap_or("../pom.xml").trim();
    if relative.is_empty() {
        return None;
    }
    let dir = child.source_path.as_deref()?.parent()?;
    let mut path = dir.join(relative);
    if path.extension().map_or(true, |ext| ext != "xml") {
        path.push("pom.xml");
    }
    Some(normalize_path(&path))
}

fn is_parent(candidate: &RawPom, parent: &Parent) -> bool {
    candidate.effective_group_id() == Some(parent.group_id.as_str())
        && candidate.artifact_id == parent.artifact_id
        && version_matches(candidate, &parent.version)
}

/// Lexical `.`/`..` removal; the file system is not consulted.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
