//! Mirrors and server credentials, as in Maven's `settings.xml`.

use std::fmt;

use crate::repository::RepositoryDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    pub id: String,
    pub url: String,
    /// `*`, `external:*`, a comma separated id list; `!id` excludes.
    pub mirror_of: String,
}

impl Mirror {
    pub fn matches(&self, repository: &RepositoryDescriptor) -> bool {
        let patterns: Vec<&str> = self
            .mirror_of
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if patterns
            .iter()
            .any(|p| p.strip_prefix('!') == Some(repository.id.as_str()))
        {
            return false;
        }
        patterns.iter().any(|pattern| match *pattern {
            "*" => true,
            "external:*" => !is_local_url(&repository.url),
            id => id == repository.id,
        })
    }
}

fn is_local_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("file:") {
        return true;
    }
    let host = lower
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(&lower)
        .split(['/', ':'])
        .next()
        .unwrap_or_default();
    host == "localhost" || host == "127.0.0.1"
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Repository or mirror id.
    pub id: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The first matching mirror replaces id and url; the release/snapshot
/// policy of the original repository is kept.
pub fn apply_mirrors(mirrors: &[Mirror], repository: RepositoryDescriptor) -> RepositoryDescriptor {
    match mirrors.iter().find(|mirror| mirror.matches(&repository)) {
        Some(mirror) => {
            tracing::debug!(
                target: "remold.maven",
                repository = %repository.id,
                mirror = %mirror.id,
                "repository mirrored"
            );
            RepositoryDescriptor {
                id: mirror.id.clone(),
                url: mirror.url.clone(),
                ..repository
            }
        }
        None => repository,
    }
}

pub fn apply_credentials(
    credentials: &[Credentials],
    mut repository: RepositoryDescriptor,
) -> RepositoryDescriptor {
    if let Some(found) = credentials.iter().find(|c| c.id == repository.id) {
        repository.username = Some(found.username.clone());
        repository.password = Some(found.password.clone());
    }
    repository
}
