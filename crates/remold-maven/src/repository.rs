//! Artifact repositories in the Maven 2 layout.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use base64::Engine as _;
use parking_lot::RwLock;

use crate::coordinates::{Gav, GroupArtifact};
use crate::error::RepositoryError;
use crate::metadata::MavenMetadata;

/// A repository as declared in a POM or in configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    pub id: String,
    pub url: String,
    pub releases: bool,
    pub snapshots: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RepositoryDescriptor {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            releases: true,
            snapshots: true,
            username: None,
            password: None,
        }
    }

    pub fn maven_central() -> Self {
        Self {
            snapshots: false,
            ..Self::new("central", "https://repo.maven.apache.org/maven2")
        }
    }

    pub fn accepts(&self, version: &str) -> bool {
        if version.ends_with("-SNAPSHOT") {
            self.snapshots
        } else {
            self.releases
        }
    }
}

impl fmt::Debug for RepositoryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryDescriptor")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("releases", &self.releases)
            .field("snapshots", &self.snapshots)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Path of an artifact file relative to the repository root.
pub fn artifact_path(
    gav: &Gav,
    file_version: &str,
    classifier: Option<&str>,
    extension: &str,
) -> String {
    let mut name = format!("{}-{file_version}", gav.artifact_id);
    if let Some(classifier) = classifier {
        name.push('-');
        name.push_str(classifier);
    }
    format!(
        "{}/{}/{name}.{extension}",
        gav.group_artifact().path(),
        gav.version
    )
}

/// Path of `maven-metadata.xml` at artifact level, or version level when
/// `version` is given.
pub fn metadata_path(ga: &GroupArtifact, version: Option<&str>) -> String {
    match version {
        Some(version) => format!("{}/{version}/maven-metadata.xml", ga.path()),
        None => format!("{}/maven-metadata.xml", ga.path()),
    }
}

/// Read access to a repository: metadata, POMs and artifacts.
///
/// `Ok(None)` means "not in this repository"; errors are reserved for
/// failures that may succeed on retry or indicate a broken repository.
pub trait ArtifactRepository: Send + Sync {
    fn id(&self) -> &str;

    /// Identity of the repository contents, used as a cache key.
    fn url(&self) -> &str;

    /// Release/snapshot policy.
    fn accepts(&self, _version: &str) -> bool {
        true
    }

    fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>, RepositoryError>;

    fn metadata(
        &self,
        ga: &GroupArtifact,
        version: Option<&str>,
    ) -> Result<Option<MavenMetadata>, RepositoryError> {
        let path = metadata_path(ga, version);
        match self.fetch(&path)? {
            Some(bytes) => {
                MavenMetadata::parse(&bytes, &format!("{}/{path}", self.url())).map(Some)
            }
            None => Ok(None),
        }
    }

    fn pom(&self, gav: &Gav, file_version: &str) -> Result<Option<Vec<u8>>, RepositoryError> {
        self.fetch(&artifact_path(gav, file_version, None, "pom"))
    }

    fn artifact(
        &self,
        gav: &Gav,
        file_version: &str,
        classifier: Option<&str>,
        extension: &str,
    ) -> Result<Option<Vec<u8>>, RepositoryError> {
        self.fetch(&artifact_path(gav, file_version, classifier, extension))
    }
}

/// A directory in the Maven local repository layout (`~/.m2/repository`
/// or a `file://` URL).
#[derive(Debug, Clone)]
pub struct LocalRepository {
    id: String,
    url: String,
    root: PathBuf,
    releases: bool,
    snapshots: bool,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            id: "local".to_owned(),
            url: format!("file://{}", root.display()),
            root,
            releases: true,
            snapshots: true,
        }
    }

    pub fn from_descriptor(descriptor: &RepositoryDescriptor, root: PathBuf) -> Self {
        Self {
            id: descriptor.id.clone(),
            releases: descriptor.releases,
            snapshots: descriptor.snapshots,
            ..Self::new(root)
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn versions_on_disk(&self, ga: &GroupArtifact) -> Vec<String> {
        let dir = self.root.join(ga.path());
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut versions: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
            .collect();
        versions.sort();
        versions
    }
}

impl ArtifactRepository for LocalRepository {
    fn id(&self) -> &str {
        &self.id
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn accepts(&self, version: &str) -> bool {
        if version.ends_with("-SNAPSHOT") {
            self.snapshots
        } else {
            self.releases
        }
    }

    fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>, RepositoryError> {
        let path = self.root.join(path);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(RepositoryError::Io { path, source }),
        }
    }

    /// Falls back to `maven-metadata-local.xml`, then to the version
    /// directories present on disk.
    fn metadata(
        &self,
        ga: &GroupArtifact,
        version: Option<&str>,
    ) -> Result<Option<MavenMetadata>, RepositoryError> {
        let mut found: Option<MavenMetadata> = None;
        let base = metadata_path(ga, version);
        let local = base.replace("maven-metadata.xml", "maven-metadata-local.xml");
        for path in [base, local] {
            if let Some(bytes) = self.fetch(&path)? {
                let parsed = MavenMetadata::parse(&bytes, &format!("{}/{path}", self.url))?;
                match found.as_mut() {
                    Some(existing) => existing.merge(parsed),
                    None => found = Some(parsed),
                }
            }
        }
        if found.is_none() && version.is_none() {
            let versions = self.versions_on_disk(ga);
            if !versions.is_empty() {
                found = Some(MavenMetadata {
                    versions,
                    ..MavenMetadata::default()
                });
            }
        }
        Ok(found)
    }
}

/// A remote repository over HTTP(S).
pub struct HttpRepository {
    id: String,
    url: String,
    releases: bool,
    snapshots: bool,
    authorization: Option<String>,
    agent: ureq::Agent,
}

impl HttpRepository {
    pub fn new(
        descriptor: &RepositoryDescriptor,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(read_timeout)
            .build();
        let authorization = match (&descriptor.username, &descriptor.password) {
            (Some(username), Some(password)) => Some(format!(
                "Basic {}",
                base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"))
            )),
            _ => None,
        };
        Self {
            id: descriptor.id.clone(),
            url: descriptor.url.trim_end_matches('/').to_owned(),
            releases: descriptor.releases,
            snapshots: descriptor.snapshots,
            authorization,
            agent,
        }
    }
}

impl fmt::Debug for HttpRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRepository")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("authenticated", &self.authorization.is_some())
            .finish()
    }
}

impl ArtifactRepository for HttpRepository {
    fn id(&self) -> &str {
        &self.id
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn accepts(&self, version: &str) -> bool {
        if version.ends_with("-SNAPSHOT") {
            self.snapshots
        } else {
            self.releases
        }
    }

    fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>, RepositoryError> {
        let url = format!("{}/{path}", self.url);
        let mut request = self.agent.get(&url);
        if let Some(authorization) = &self.authorization {
            request = request.set("Authorization", authorization);
        }
        match request.call() {
            Ok(response) => {
                let mut bytes = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|err| {
                        if is_timeout(&err) {
                            RepositoryError::Timeout { url: url.clone() }
                        } else {
                            RepositoryError::Http {
                                message: format!("failed to read response from {url}: {err}"),
                                url: url.clone(),
                            }
                        }
                    })?;
                Ok(Some(bytes))
            }
            Err(ureq::Error::Status(404 | 410, _)) => Ok(None),
            Err(ureq::Error::Status(code, _)) => Err(RepositoryError::Http {
                message: format!("server returned status {code} for {url}"),
                url,
            }),
            Err(ureq::Error::Transport(transport)) => {
                let timed_out = std::error::Error::source(&transport)
                    .and_then(|source| source.downcast_ref::<std::io::Error>())
                    .is_some_and(is_timeout)
                    || transport.to_string().contains("timed out");
                if timed_out {
                    Err(RepositoryError::Timeout { url })
                } else {
                    Err(RepositoryError::Http {
                        message: format!("transport error for {url}: {transport}"),
                        url,
                    })
                }
            }
        }
    }
}

fn is_timeout(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
    )
}

/// Repository contents held in memory, keyed by layout path.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    id: String,
    url: String,
    entries: RwLock<HashMap<String, Vec<u8>>>,
    fetches: AtomicUsize,
}

impl MemoryRepository {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            url: format!("memory://{id}"),
            id,
            entries: RwLock::default(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.write().insert(path.into(), bytes.into());
    }

    pub fn insert_pom(&self, gav: &Gav, xml: &str) {
        self.insert(artifact_path(gav, &gav.version, None, "pom"), xml);
    }

    pub fn insert_metadata(&self, ga: &GroupArtifact, version: Option<&str>, xml: &str) {
        self.insert(metadata_path(ga, version), xml);
    }

    /// Number of `fetch` calls served so far, hits and misses alike.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl ArtifactRepository for MemoryRepository {
    fn id(&self) -> &str {
        &self.id
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>, RepositoryError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self.entries.read().get(path).cloned())
    }
}
