use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::coordinates::{Gav, GroupArtifact};
use crate::metadata::MavenMetadata;
use crate::pom::RawPom;
use crate::resolver::ResolvedPom;

/// `(repository url, coordinate, file version)`.
pub(crate) type PomKey = (String, Gav, String);
/// `(repository url, group:artifact, version for version-level metadata)`.
pub(crate) type MetadataKey = (String, GroupArtifact, Option<String>);

/// Downloads and models shared by every resolution of one resolver.
///
/// Misses (`None`) are cached too; errors are not, so a timed out request
/// is retried by the next resolution.
#[derive(Default)]
pub struct PomCache {
    poms: RwLock<HashMap<PomKey, Option<Arc<RawPom>>>>,
    metadata: RwLock<HashMap<MetadataKey, Option<MavenMetadata>>>,
    resolved: RwLock<HashMap<Gav, Arc<ResolvedPom>>>,
}

impl PomCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn pom(&self, key: &PomKey) -> Option<Option<Arc<RawPom>>> {
        self.poms.read().get(key).cloned()
    }

    pub(crate) fn put_pom(&self, key: PomKey, pom: Option<Arc<RawPom>>) {
        self.poms.write().insert(key, pom);
    }

    pub(crate) fn metadata(&self, key: &MetadataKey) -> Option<Option<MavenMetadata>> {
        self.metadata.read().get(key).cloned()
    }

    pub(crate) fn put_metadata(&self, key: MetadataKey, metadata: Option<MavenMetadata>) {
        self.metadata.write().insert(key, metadata);
    }

    pub(crate) fn resolved(&self, gav: &Gav) -> Option<Arc<ResolvedPom>> {
        self.resolved.read().get(gav).cloned()
    }

    /// Keeps the first model when two threads race.
    pub(crate) fn put_resolved(&self, gav: Gav, pom: Arc<ResolvedPom>) -> Arc<ResolvedPom> {
        self.resolved.write().entry(gav).or_insert(pom).clone()
    }

    /// Number of downloaded POM lookups held, misses included.
    pub fn pom_count(&self) -> usize {
        self.poms.read().len()
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved.read().len()
    }
}
