//! Maven POM model resolution.
//!
//! [`RawPom`] is a document as written. [`MavenResolver`] turns it into a
//! [`ResolvedPom`] (parents, profiles, properties, dependency management)
//! and then into one dependency forest per scope. Downloads go through
//! [`ArtifactRepository`] implementations and are cached per resolver.

#![forbid(unsafe_code)]

mod cache;
mod coordinates;
mod error;
mod graph;
mod interpolate;
mod metadata;
mod options;
mod pom;
mod profile;
mod reactor;
mod repository;
mod resolver;
mod settings;
mod version;

pub use cache::PomCache;
pub use coordinates::{Exclusion, Gav, GroupArtifact, Scope};
pub use error::{DependencyResolutionError, MavenError, RepositoryError};
pub use graph::{print_dependency_tree, ResolvedDependency};
pub use metadata::{MavenMetadata, Snapshot};
pub use options::{PinnedSnapshot, ResolverOptions};
pub use pom::{
    Activation, ActivationProperty, Build, Dependency, DependencyKey, License, Parent, Plugin,
    Profile, RawPom,
};
pub use reactor::Reactor;
pub use repository::{
    artifact_path, metadata_path, ArtifactRepository, HttpRepository, LocalRepository,
    MemoryRepository, RepositoryDescriptor,
};
pub use resolver::{
    MavenResolutionResult, MavenResolver, ResolutionStage, ResolvedPom, MAX_PARENT_DEPTH,
};
pub use settings::{apply_credentials, apply_mirrors, Credentials, Mirror};
pub use version::{ComparableVersion, VersionRange, VersionRequirement};
