use crate::error::RepositoryError;
use crate::pom::child_text;

/// `maven-metadata.xml`, at artifact level (versions) or version level
/// (snapshot timestamp).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MavenMetadata {
    pub versions: Vec<String>,
    pub latest: Option<String>,
    pub release: Option<String>,
    pub snapshot: Option<Snapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub timestamp: String,
    pub build_number: String,
}

impl Snapshot {
    /// `1.0-SNAPSHOT` -> `1.0-20220101.123456-1`.
    pub fn dated_version(&self, version: &str) -> String {
        match version.strip_suffix("SNAPSHOT") {
            Some(base) => format!("{base}{}-{}", self.timestamp, self.build_number),
            None => version.to_owned(),
        }
    }
}

impl MavenMetadata {
    pub fn parse(bytes: &[u8], location: &str) -> Result<Self, RepositoryError> {
        let raw = String::from_utf8_lossy(bytes);
        let text = raw.strip_prefix('\u{feff}').unwrap_or(raw.as_ref());
        let doc = roxmltree::Document::parse(text).map_err(|err| {
            RepositoryError::InvalidMetadata {
                location: location.to_owned(),
                message: err.to_string(),
            }
        })?;
        let root = doc.root_element();
        if !root.has_tag_name("metadata") {
            return Err(RepositoryError::InvalidMetadata {
                location: location.to_owned(),
                message: format!("unexpected root element <{}>", root.tag_name().name()),
            });
        }

        let mut metadata = MavenMetadata::default();
        let Some(versioning) = root
            .children()
            .find(|n| n.is_element() && n.has_tag_name("versioning"))
        else {
            return Ok(metadata);
        };

        metadata.latest = child_text(&versioning, "latest");
        metadata.release = child_text(&versioning, "release");
        if let Some(versions) = versioning
            .children()
            .find(|n| n.is_element() && n.has_tag_name("versions"))
        {
            metadata.versions = versions
                .children()
                .filter(|n| n.is_element() && n.has_tag_name("version"))
                .filter_map(|n| n.text())
                .map(|t| t.trim().to_owned())
                .filter(|t| !t.is_empty())
                .collect();
        }
        if let Some(snapshot) = versioning
            .children()
            .find(|n| n.is_element() && n.has_tag_name("snapshot"))
        {
            // A local install writes `<localCopy>true</localCopy>` without a timestamp.
            if let (Some(timestamp), Some(build_number)) = (
                child_text(&snapshot, "timestamp"),
                child_text(&snapshot, "buildNumber"),
            ) {
                metadata.snapshot = Some(Snapshot {
                    timestamp,
                    build_number,
                });
            }
        }
        Ok(metadata)
    }

    /// Union of versions; the first snapshot wins.
    pub fn merge(&mut self, other: MavenMetadata) {
        for version in other.versions {
            if !self.versions.contains(&version) {
                self.versions.push(version);
            }
        }
        self.latest = self.latest.take().or(other.latest);
        self.release = self.release.take().or(other.release);
        self.snapshot = self.snapshot.take().or(other.snapshot);
    }
}
