use std::path::PathBuf;

use thiserror::Error;

/// Fatal failure while building the model of one POM.
#[derive(Debug, Error)]
pub enum MavenError {
    #[error("failed to parse {location}: {source}")]
    Xml {
        location: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("{location} is missing required element <{element}>")]
    MissingElement {
        location: String,
        element: &'static str,
    },

    #[error("failed to resolve parent {parent} of {coordinate}: {source}")]
    ParentResolution {
        coordinate: String,
        parent: String,
        #[source]
        source: Box<MavenError>,
    },

    #[error("parent cycle detected: {}", chain.join(" -> "))]
    ParentCycle { chain: Vec<String> },

    #[error("parent chain of {coordinate} is deeper than {max}")]
    ParentDepthExceeded { coordinate: String, max: usize },

    #[error("BOM import cycle detected: {}", chain.join(" -> "))]
    ImportCycle { chain: Vec<String> },

    #[error("{coordinate} was not found in any of: {}", repositories.join(", "))]
    PomNotFound {
        coordinate: String,
        repositories: Vec<String>,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download {coordinate}: {source}")]
    Repository {
        coordinate: String,
        #[source]
        source: RepositoryError,
    },
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{message}")]
    Http { url: String, message: String },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metadata at {location}: {message}")]
    InvalidMetadata { location: String, message: String },
}

/// A dependency that could not be resolved. Never fatal for the module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to resolve {coordinate}: {message}")]
pub struct DependencyResolutionError {
    pub coordinate: String,
    pub message: String,
}

impl DependencyResolutionError {
    pub fn new(coordinate: impl Into<String>, message: impl ToString) -> Self {
        Self {
            coordinate: coordinate.into(),
            message: message.to_string(),
        }
    }
}
