use std::sync::Arc;

use pretty_assertions::assert_eq;
use remold_maven::{MavenError, MemoryRepository};

use super::support::{dep, management, memory_resolver, project, publish};

const IMPORT: &str = "<type>pom</type><scope>import</scope>";

#[test]
fn imported_bom_contributes_versions_but_importer_wins() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(
        &repo,
        "com.test:bom:1",
        &format!(
            "<packaging>pom</packaging>{}",
            management(&[dep("com.lib:a:9.0", ""), dep("com.lib:b:2.0", "")])
        ),
    );

    let app = project(
        "com.test:app:1.0",
        &management(&[dep("com.test:bom:1", IMPORT), dep("com.lib:a:1.0", "")]),
    );
    let pom = memory_resolver(&repo).resolve_pom(app).unwrap();

    assert_eq!(pom.managed_version("com.lib", "a"), Some("1.0"));
    assert_eq!(pom.managed_version("com.lib", "b"), Some("2.0"));
    assert_eq!(pom.managed_version("com.test", "bom"), None);
}

#[test]
fn bom_properties_resolve_in_the_bom() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(
        &repo,
        "com.test:bom:1",
        &format!(
            "<properties><c.version>5.0</c.version></properties>{}",
            management(&[dep("com.lib:c:${c.version}", "")])
        ),
    );

    let app = project(
        "com.test:app:1.0",
        &format!(
            "<properties><c.version>7.0</c.version></properties>{}",
            management(&[dep("com.test:bom:1", IMPORT)])
        ),
    );
    let pom = memory_resolver(&repo).resolve_pom(app).unwrap();
    assert_eq!(pom.managed_version("com.lib", "c"), Some("5.0"));
}

#[test]
fn first_declared_import_wins() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(&repo, "com.test:first:1", &management(&[dep("com.lib:d:1.0", "")]));
    publish(&repo, "com.test:second:1", &management(&[dep("com.lib:d:2.0", "")]));

    let app = project(
        "com.test:app:1.0",
        &management(&[
            dep("com.test:first:1", IMPORT),
            dep("com.test:second:1", IMPORT),
        ]),
    );
    let pom = memory_resolver(&repo).resolve_pom(app).unwrap();
    assert_eq!(pom.managed_version("com.lib", "d"), Some("1.0"));
}

#[test]
fn child_management_overrides_parent_management() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(
        &repo,
        "com.test:parent:1",
        &management(&[dep("com.lib:a:1.0", ""), dep("com.lib:b:1.0", "")]),
    );

    let app = project(
        "com.test:app:1.0",
        &format!(
            "<parent><groupId>com.test</groupId><artifactId>parent</artifactId><version>1</version><relativePath/></parent>{}",
            management(&[dep("com.lib:a:2.0", "")])
        ),
    );
    let pom = memory_resolver(&repo).resolve_pom(app).unwrap();
    assert_eq!(pom.managed_version("com.lib", "a"), Some("2.0"));
    assert_eq!(pom.managed_version("com.lib", "b"), Some("1.0"));
}

#[test]
fn import_cycle_is_reported() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(&repo, "com.test:bom1:1", &management(&[dep("com.test:bom2:1", IMPORT)]));
    publish(&repo, "com.test:bom2:1", &management(&[dep("com.test:bom1:1", IMPORT)]));

    let app = project(
        "com.test:app:1.0",
        &management(&[dep("com.test:bom1:1", IMPORT)]),
    );
    match memory_resolver(&repo).resolve_pom(app) {
        Err(MavenError::ImportCycle { chain }) => assert_eq!(
            chain,
            vec![
                "com.test:app:1.0",
                "com.test:bom1:1",
                "com.test:bom2:1",
                "com.test:bom1:1"
            ]
        ),
        other => panic!("expected an import cycle, got {other:?}"),
    }
}

#[test]
fn missing_bom_is_fatal() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    let app = project(
        "com.test:app:1.0",
        &management(&[dep("com.test:absent:1", IMPORT)]),
    );
    let err = memory_resolver(&repo).resolve_pom(app).unwrap_err();
    assert!(
        matches!(err, MavenError::PomNotFound { ref coordinate, .. } if coordinate == "com.test:absent:1"),
        "{err:?}"
    );
}
