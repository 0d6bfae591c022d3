use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(u64);

impl MarkerId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        MarkerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Out-of-band metadata attached to a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// A search hit, optionally with a description shown to the user.
    SearchResult {
        id: MarkerId,
        description: Option<String>,
    },
    /// Logical source set (`main`, `test`) the file belongs to.
    SourceSet { id: MarkerId, name: String },
    /// Result of a recipe that changed this tree.
    Recipe { id: MarkerId, name: String },
}

impl Marker {
    pub fn id(&self) -> MarkerId {
        match self {
            Marker::SearchResult { id, .. } | Marker::SourceSet { id, .. } | Marker::Recipe { id, .. } => *id,
        }
    }

    pub fn search_result(description: Option<String>) -> Self {
        Marker::SearchResult {
            id: MarkerId::next(),
            description,
        }
    }

    pub fn source_set(name: impl Into<String>) -> Self {
        Marker::SourceSet {
            id: MarkerId::next(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    markers: Vec<Marker>,
}

impl Markers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn find(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id() == id)
    }

    /// Add a marker, replacing one with the same id.
    pub fn add(mut self, marker: Marker) -> Self {
        match self.markers.iter_mut().find(|m| m.id() == marker.id()) {
            Some(existing) => *existing = marker,
            None => self.markers.push(marker),
        }
        self
    }

    pub fn remove(mut self, id: MarkerId) -> Self {
        self.markers.retain(|m| m.id() != id);
        self
    }

    pub fn search_results(&self) -> impl Iterator<Item = &Marker> {
        self.markers
            .iter()
            .filter(|m| matches!(m, Marker::SearchResult { .. }))
    }
}
