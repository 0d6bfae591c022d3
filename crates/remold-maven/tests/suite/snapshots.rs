use std::sync::Arc;

use pretty_assertions::assert_eq;
use remold_maven::{
    artifact_path, Gav, MemoryRepository, PinnedSnapshot, ResolverOptions, Scope,
};

use super::support::{
    dep, dependencies, local_resolver, memory_resolver, memory_resolver_with, pom, project,
    publish, publish_on_disk,
};

const SNAPSHOT_METADATA: &str = r#"<metadata>
  <groupId>g</groupId>
  <artifactId>snap</artifactId>
  <version>1.0-SNAPSHOT</version>
  <versioning>
    <snapshot><timestamp>20220101.123456</timestamp><buildNumber>7</buildNumber></snapshot>
  </versioning>
</metadata>"#;

fn publish_dated(repo: &MemoryRepository, dated: &str, body: &str) {
    let gav = Gav::new("g", "snap", "1.0-SNAPSHOT");
    repo.insert(
        artifact_path(&gav, dated, None, "pom"),
        pom("g:snap:1.0-SNAPSHOT", body),
    );
}

#[test]
fn snapshot_is_dated_from_version_metadata() {
    let repo = Arc::new(MemoryRepository::new("snapshots"));
    repo.insert_metadata(
        &Gav::new("g", "snap", "1.0-SNAPSHOT").group_artifact(),
        Some("1.0-SNAPSHOT"),
        SNAPSHOT_METADATA,
    );
    publish_dated(
        &repo,
        "1.0-20220101.123456-7",
        &dependencies(&[dep("g:from-dated:1", "")]),
    );
    publish(&repo, "g:from-dated:1", "");

    let app = project("g:app:1", &dependencies(&[dep("g:snap:1.0-SNAPSHOT", "")]));
    let result = memory_resolver(&repo).resolve(app).unwrap();

    let snap = result.find(Scope::Compile, "g", "snap").unwrap();
    assert_eq!(snap.gav.version, "1.0-SNAPSHOT");
    assert_eq!(
        snap.dated_snapshot_version.as_deref(),
        Some("1.0-20220101.123456-7")
    );
    assert_eq!(snap.children[0].gav.artifact_id, "from-dated");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn pinned_snapshot_wins_over_metadata() {
    let repo = Arc::new(MemoryRepository::new("snapshots"));
    repo.insert_metadata(
        &Gav::new("g", "snap", "1.0-SNAPSHOT").group_artifact(),
        Some("1.0-SNAPSHOT"),
        SNAPSHOT_METADATA,
    );
    publish_dated(&repo, "1.0-20200101.000000-1", "");

    let options = ResolverOptions {
        pinned_snapshots: vec![PinnedSnapshot {
            gav: Gav::new("g", "snap", "1.0-SNAPSHOT"),
            dated_version: "1.0-20200101.000000-1".into(),
        }],
        ..ResolverOptions::default()
    };
    let app = project("g:app:1", &dependencies(&[dep("g:snap:1.0-SNAPSHOT", "")]));
    let result = memory_resolver_with(&repo, options).resolve(app).unwrap();

    let snap = result.find(Scope::Compile, "g", "snap").unwrap();
    assert_eq!(
        snap.dated_snapshot_version.as_deref(),
        Some("1.0-20200101.000000-1")
    );
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn locally_installed_snapshot_needs_no_metadata() {
    let temp = tempfile::tempdir().expect("temp dir");
    let repo = temp.path().join("repo");
    publish_on_disk(&repo, "g:snap:1.0-SNAPSHOT", "");

    let app = project("g:app:1", &dependencies(&[dep("g:snap:1.0-SNAPSHOT", "")]));
    let result = local_resolver(&repo).resolve(app).unwrap();

    let snap = result.find(Scope::Compile, "g", "snap").unwrap();
    assert_eq!(snap.dated_snapshot_version, None);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}
