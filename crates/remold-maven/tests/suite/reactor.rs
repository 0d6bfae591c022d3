use std::path::PathBuf;

use pretty_assertions::assert_eq;
use remold_maven::{MavenError, MavenResolver, Reactor, ResolverOptions, Scope};

use super::support::{dep, dependencies, pom, write_file};

fn module(artifact_id: &str, body: &str) -> String {
    format!(
        r#"<project>
  <parent><groupId>com.test</groupId><artifactId>root</artifactId><version>1.0</version></parent>
  <artifactId>{artifact_id}</artifactId>
  {body}
</project>"#
    )
}

#[test]
fn loads_modules_and_resolves_siblings() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let root = temp.path();
    write_file(
        &root.join("pom.xml"),
        &pom(
            "com.test:root:1.0",
            "<packaging>pom</packaging><modules><module>core</module><module>app</module><module>ghost</module></modules>",
        ),
    );
    write_file(&root.join("core/pom.xml"), &module("core", ""));
    write_file(
        &root.join("app/pom.xml"),
        &module(
            "app",
            &dependencies(&[dep("com.test:core:${project.version}", "")]),
        ),
    );

    let reactor = Reactor::load(root)?;
    let artifacts: Vec<&str> = reactor
        .modules()
        .iter()
        .map(|pom| pom.artifact_id.as_str())
        .collect();
    assert_eq!(artifacts, vec!["root", "app", "core"]);

    let report = reactor.resolve(&MavenResolver::new(ResolverOptions::default()));
    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(report.len(), 3);

    let app = report
        .successes
        .iter()
        .find(|result| result.pom.gav.artifact_id == "app")
        .ok_or_else(|| anyhow::anyhow!("app module missing"))?;
    assert_eq!(app.pom.gav.to_string(), "com.test:app:1.0");
    let core = app.find(Scope::Compile, "com.test", "core").unwrap();
    assert_eq!(core.gav.version, "1.0");
    assert!(app.errors.is_empty(), "{:?}", app.errors);
    Ok(())
}

#[test]
fn one_broken_module_does_not_affect_the_others() {
    let reactor = Reactor::from_documents([
        (PathBuf::from("/work/good/pom.xml"), pom("com.test:good:1.0", "")),
        (PathBuf::from("/work/broken/pom.xml"), "<project><artifactId>".to_string()),
        (
            PathBuf::from("/work/orphan/pom.xml"),
            pom(
                "com.test:orphan:1.0",
                "<parent><groupId>com.test</groupId><artifactId>nowhere</artifactId><version>1.0</version></parent>",
            ),
        ),
    ]);
    assert_eq!(reactor.modules().len(), 2);

    let report = reactor.resolve(&MavenResolver::new(ResolverOptions::default()));
    assert_eq!(report.successes.len(), 1);
    assert_eq!(report.successes[0].pom.gav.to_string(), "com.test:good:1.0");

    let failures: Vec<&str> = report.failures.iter().map(|f| f.unit.as_str()).collect();
    assert_eq!(failures, vec!["/work/broken/pom.xml", "/work/orphan/pom.xml"]);
    assert!(matches!(report.failures[0].error, MavenError::Xml { .. }));
    assert!(matches!(
        report.failures[1].error,
        MavenError::ParentResolution { .. }
    ));
}
