use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use remold_config::MavenConfig;

use crate::coordinates::Gav;
use crate::repository::RepositoryDescriptor;
use crate::settings::{Credentials, Mirror};

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Skip every HTTP repository.
    pub offline: bool,
    pub local_repository: Option<PathBuf>,
    /// Profile ids activated explicitly.
    pub active_profiles: Vec<String>,
    pub jdk_version: Option<String>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// User properties; win over every model property.
    pub properties: BTreeMap<String, String>,
    /// Environment for `${env.NAME}` and property activation.
    pub environment: BTreeMap<String, String>,
    /// Consulted after the repositories declared by POMs.
    pub repositories: Vec<RepositoryDescriptor>,
    pub mirrors: Vec<Mirror>,
    pub credentials: Vec<Credentials>,
    pub pinned_snapshots: Vec<PinnedSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedSnapshot {
    pub gav: Gav,
    pub dated_version: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            offline: false,
            local_repository: None,
            active_profiles: Vec::new(),
            jdk_version: None,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
            properties: BTreeMap::new(),
            environment: BTreeMap::new(),
            repositories: Vec::new(),
            mirrors: Vec::new(),
            credentials: Vec::new(),
            pinned_snapshots: Vec::new(),
        }
    }
}

impl ResolverOptions {
    /// Options from configuration, with the process environment.
    ///
    /// Maven Central is used when no repository is configured.
    pub fn from_config(config: &MavenConfig) -> Self {
        let mut repositories: Vec<RepositoryDescriptor> = config
            .repositories
            .iter()
            .map(|repo| RepositoryDescriptor {
                releases: repo.releases,
                snapshots: repo.snapshots,
                ..RepositoryDescriptor::new(&repo.id, &repo.url)
            })
            .collect();
        if repositories.is_empty() {
            repositories.push(RepositoryDescriptor::maven_central());
        }

        let pinned_snapshots = config
            .pinned_snapshots
            .iter()
            .filter_map(|pinned| match Gav::parse(&pinned.coordinate) {
                Some(gav) => Some(PinnedSnapshot {
                    gav,
                    dated_version: pinned.dated_version.clone(),
                }),
                None => {
                    tracing::warn!(
                        target: "remold.maven",
                        coordinate = %pinned.coordinate,
                        "ignoring pinned snapshot with an invalid coordinate"
                    );
                    None
                }
            })
            .collect();

        Self {
            offline: config.offline,
            local_repository: config.local_repository_path(),
            active_profiles: config.active_profiles.clone(),
            jdk_version: config.jdk_version.clone(),
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            read_timeout: Duration::from_millis(config.read_timeout_ms),
            properties: config.properties.clone(),
            environment: std::env::vars().collect(),
            repositories,
            mirrors: config
                .mirrors
                .iter()
                .map(|mirror| Mirror {
                    id: mirror.id.clone(),
                    url: mirror.url.clone(),
                    mirror_of: mirror.mirror_of.clone(),
                })
                .collect(),
            credentials: config
                .credentials
                .iter()
                .map(|c| Credentials {
                    id: c.id.clone(),
                    username: c.username.clone(),
                    password: c.password.clone(),
                })
                .collect(),
            pinned_snapshots,
        }
    }

    pub(crate) fn pinned_snapshot(&self, gav: &Gav) -> Option<&str> {
        self.pinned_snapshots
            .iter()
            .find(|pinned| pinned.gav == *gav)
            .map(|pinned| pinned.dated_version.as_str())
    }
}
