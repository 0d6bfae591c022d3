//! A fixture repository reproducing the parent/BOM structure of
//! `spring-boot-starter-parent:2.2.11.RELEASE`.

use std::path::Path;

use pretty_assertions::assert_eq;
use remold_maven::{print_dependency_tree, Scope};

use super::support::{dep, dependencies, local_resolver, management, project, publish_on_disk};

const IMPORT: &str = "<type>pom</type><scope>import</scope>";

fn publish_spring_boot(repo: &Path) {
    publish_on_disk(
        repo,
        "com.fasterxml.jackson:jackson-parent:2.10",
        "<packaging>pom</packaging><properties><javac.src.version>1.6</javac.src.version></properties>",
    );
    publish_on_disk(
        repo,
        "com.fasterxml.jackson:jackson-bom:2.10.5.20201202",
        &format!(
            r#"<parent>
  <groupId>com.fasterxml.jackson</groupId>
  <artifactId>jackson-parent</artifactId>
  <version>2.10</version>
  <relativePath/>
</parent>
<packaging>pom</packaging>
<properties>
  <jackson.version>2.10.5</jackson.version>
  <jackson.version.annotations>${{jackson.version}}</jackson.version.annotations>
  <jackson.version.core>${{jackson.version}}</jackson.version.core>
  <jackson.version.databind>2.10.5.1</jackson.version.databind>
</properties>
{}"#,
            management(&[
                dep(
                    "com.fasterxml.jackson.core:jackson-annotations:${jackson.version.annotations}",
                    ""
                ),
                dep("com.fasterxml.jackson.core:jackson-core:${jackson.version.core}", ""),
                dep(
                    "com.fasterxml.jackson.core:jackson-databind:${jackson.version.databind}",
                    ""
                ),
            ])
        ),
    );
    publish_on_disk(
        repo,
        "org.springframework.boot:spring-boot-dependencies:2.2.11.RELEASE",
        &format!(
            "<packaging>pom</packaging><properties><jackson.version>2.10.5.20201202</jackson.version></properties>{}",
            management(&[dep(
                "com.fasterxml.jackson:jackson-bom:${jackson.version}",
                IMPORT
            )])
        ),
    );
    publish_on_disk(
        repo,
        "org.springframework.boot:spring-boot-starter-parent:2.2.11.RELEASE",
        r#"<parent>
  <groupId>org.springframework.boot</groupId>
  <artifactId>spring-boot-dependencies</artifactId>
  <version>2.2.11.RELEASE</version>
  <relativePath>../../spring-boot-dependencies</relativePath>
</parent>
<packaging>pom</packaging>
<properties><java.version>1.8</java.version></properties>"#,
    );

    publish_on_disk(
        repo,
        "com.fasterxml.jackson.core:jackson-databind:2.10.5.1",
        &dependencies(&[
            dep("com.fasterxml.jackson.core:jackson-annotations:2.10.5", ""),
            dep("com.fasterxml.jackson.core:jackson-core:2.10.5", ""),
        ]),
    );
    publish_on_disk(repo, "com.fasterxml.jackson.core:jackson-annotations:2.10.5", "");
    publish_on_disk(repo, "com.fasterxml.jackson.core:jackson-core:2.10.5", "");
    publish_on_disk(
        repo,
        "com.example:client:1.0",
        &dependencies(&[dep("com.fasterxml.jackson.core:jackson-core:2.9.0", "")]),
    );
}

#[test]
fn starter_parent_pins_jackson_databind() {
    let temp = tempfile::tempdir().expect("temp dir");
    let repo = temp.path().join("repo");
    publish_spring_boot(&repo);

    let app = project(
        "com.example:demo:0.0.1-SNAPSHOT",
        &format!(
            r#"<parent>
  <groupId>org.springframework.boot</groupId>
  <artifactId>spring-boot-starter-parent</artifactId>
  <version>2.2.11.RELEASE</version>
  <relativePath/>
</parent>
{}"#,
            dependencies(&[
                dep("com.fasterxml.jackson.core:jackson-databind", ""),
                dep("com.example:client:1.0", ""),
            ])
        ),
    );
    let result = local_resolver(&repo).resolve(app).unwrap();

    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.pom.parents.len(), 2);
    assert_eq!(result.pom.property("java.version"), Some("1.8"));
    assert_eq!(
        result
            .pom
            .managed_version("com.fasterxml.jackson.core", "jackson-databind"),
        Some("2.10.5.1")
    );
    assert_eq!(
        result
            .pom
            .managed_version("com.fasterxml.jackson.core", "jackson-core"),
        Some("2.10.5")
    );

    let oracle = "\
com.example:client:1.0
com.fasterxml.jackson.core:jackson-databind:2.10.5.1
 com.fasterxml.jackson.core:jackson-annotations:2.10.5
 com.fasterxml.jackson.core:jackson-core:2.10.5
";
    assert_eq!(print_dependency_tree(result.dependencies(Scope::Compile)), oracle);
}

#[test]
fn management_overrides_versions_brought_in_transitively() {
    let temp = tempfile::tempdir().expect("temp dir");
    let repo = temp.path().join("repo");
    publish_spring_boot(&repo);

    // Only the client asks for jackson-core, at 2.9.0.
    let app = project(
        "com.example:demo:1",
        &format!(
            "<parent><groupId>org.springframework.boot</groupId><artifactId>spring-boot-starter-parent</artifactId><version>2.2.11.RELEASE</version></parent>{}",
            dependencies(&[dep("com.example:client:1.0", "")])
        ),
    );
    let result = local_resolver(&repo).resolve(app).unwrap();

    let core = result
        .find(Scope::Compile, "com.fasterxml.jackson.core", "jackson-core")
        .unwrap();
    assert_eq!(core.gav.version, "2.10.5");
    assert_eq!(core.depth, 1);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}
