use std::collections::BTreeMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use remold_maven::{
    MavenError, MavenResolver, MemoryRepository, RawPom, ResolutionStage, ResolverOptions,
    MAX_PARENT_DEPTH,
};

use super::support::{
    dep, dependencies, management, memory_resolver, pom, project, publish, write_file,
};

fn parent_ref(coordinate: &str, relative_path: Option<&str>) -> String {
    let mut parts = coordinate.split(':');
    let (g, a, v) = (
        parts.next().unwrap(),
        parts.next().unwrap(),
        parts.next().unwrap(),
    );
    let relative = relative_path
        .map(|p| format!("<relativePath>{p}</relativePath>"))
        .unwrap_or_default();
    format!("<parent><groupId>{g}</groupId><artifactId>{a}</artifactId><version>{v}</version>{relative}</parent>")
}

#[test]
fn child_property_overrides_parent_for_dependency_versions() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(
        &repo,
        "com.test:parent:1.0",
        &format!(
            "<packaging>pom</packaging><properties><lib.version>1.0</lib.version></properties>{}",
            management(&[dep("com.lib:lib:${lib.version}", "")])
        ),
    );
    publish(&repo, "com.lib:lib:2.0", "");

    let app = project(
        "com.test:app:1.0",
        &format!(
            "{}<properties><lib.version>2.0</lib.version></properties>{}",
            parent_ref("com.test:parent:1.0", Some("")),
            dependencies(&[dep("com.lib:lib", "")])
        ),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();

    assert_eq!(result.stage, ResolutionStage::DependenciesResolved);
    assert_eq!(result.pom.stage, ResolutionStage::ManagementMerged);
    assert_eq!(result.pom.property("lib.version"), Some("2.0"));
    assert_eq!(result.pom.parents.len(), 1);
    assert_eq!(result.pom.managed_version("com.lib", "lib"), Some("2.0"));
    let lib = &result.dependencies(remold_maven::Scope::Compile)[0];
    assert_eq!(lib.gav.to_string(), "com.lib:lib:2.0");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn reserved_properties_and_user_overrides() {
    let app = project(
        "com.test:app:3.1",
        &format!(
            "<properties><lib.version>1.0</lib.version></properties>{}",
            dependencies(&[
                dep("com.test:util:${project.version}", ""),
                dep("com.lib:lib:${lib.version}", ""),
                dep("com.lib:tool:${env.TOOL_VERSION}", ""),
            ])
        ),
    );
    let options = ResolverOptions {
        properties: BTreeMap::from([("lib.version".to_string(), "3.0".to_string())]),
        environment: BTreeMap::from([("TOOL_VERSION".to_string(), "0.9".to_string())]),
        ..ResolverOptions::default()
    };
    let pom = MavenResolver::new(options).resolve_pom(app).unwrap();

    let versions: Vec<Option<&str>> = pom
        .dependencies
        .iter()
        .map(|d| d.version.as_deref())
        .collect();
    assert_eq!(versions, vec![Some("3.1"), Some("3.0"), Some("0.9")]);
    assert_eq!(pom.gav.to_string(), "com.test:app:3.1");
}

#[test]
fn unresolved_placeholders_are_kept() {
    let app = project(
        "com.test:app:1.0",
        &dependencies(&[dep("com.lib:lib:${nowhere}", "")]),
    );
    let resolver = MavenResolver::new(ResolverOptions::default());
    let result = resolver.resolve(app).unwrap();
    assert_eq!(
        result.pom.dependencies[0].version.as_deref(),
        Some("${nowhere}")
    );
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].coordinate, "com.lib:lib:${nowhere}");
}

#[test]
fn profiles_contribute_dependencies_and_properties() {
    let body = format!(
        r#"<properties><channel>stable</channel></properties>
<profiles>
  <profile>
    <id>default</id>
    <activation><activeByDefault>true</activeByDefault></activation>
    {}
  </profile>
  <profile>
    <id>ci</id>
    <activation><property><name>ci</name></property></activation>
    <properties><channel>nightly</channel></properties>
    {}
  </profile>
</profiles>"#,
        dependencies(&[dep("com.lib:local:1.0", "")]),
        dependencies(&[dep("com.lib:reporting:1.0", "")])
    );

    let plain = MavenResolver::new(ResolverOptions::default())
        .resolve_pom(project("com.test:app:1.0", &body))
        .unwrap();
    assert_eq!(plain.active_profiles, vec!["default"]);
    assert_eq!(plain.property("channel"), Some("stable"));
    assert_eq!(plain.dependencies[0].artifact_id, "local");

    let ci = MavenResolver::new(ResolverOptions {
        properties: BTreeMap::from([("ci".to_string(), "true".to_string())]),
        ..ResolverOptions::default()
    })
    .resolve_pom(project("com.test:app:1.0", &body))
    .unwrap();
    assert_eq!(ci.active_profiles, vec!["ci"]);
    assert_eq!(ci.property("channel"), Some("nightly"));
    let artifacts: Vec<&str> = ci.dependencies.iter().map(|d| d.artifact_id.as_str()).collect();
    assert_eq!(artifacts, vec!["reporting"]);

    let explicit = MavenResolver::new(ResolverOptions {
        active_profiles: vec!["ci".into(), "!default".into()],
        ..ResolverOptions::default()
    })
    .resolve_pom(project("com.test:app:1.0", &body))
    .unwrap();
    assert_eq!(explicit.active_profiles, vec!["ci"]);
}

#[test]
fn parent_cycle_is_fatal() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(&repo, "g:b:1", &parent_ref("g:a:1", Some("")));
    publish(&repo, "g:a:1", &parent_ref("g:b:1", Some("")));

    let a = project("g:a:1", &parent_ref("g:b:1", Some("")));
    match memory_resolver(&repo).resolve_pom(a) {
        Err(MavenError::ParentCycle { chain }) => {
            assert_eq!(chain, vec!["g:a:1", "g:b:1", "g:a:1"]);
        }
        other => panic!("expected a parent cycle, got {other:?}"),
    }
}

#[test]
fn parent_chain_depth_is_bounded() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    for i in 0..40 {
        publish(
            &repo,
            &format!("g:p{i}:1"),
            &parent_ref(&format!("g:p{}:1", i + 1), Some("")),
        );
    }
    publish(&repo, "g:p40:1", "");

    let child = project("g:child:1", &parent_ref("g:p0:1", Some("")));
    match memory_resolver(&repo).resolve_pom(child) {
        Err(MavenError::ParentDepthExceeded { coordinate, max }) => {
            assert_eq!(coordinate, "g:child:1");
            assert_eq!(max, MAX_PARENT_DEPTH);
        }
        other => panic!("expected depth error, got {other:?}"),
    }
}

#[test]
fn missing_parent_names_the_coordinate() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    let child = project("g:child:1", &parent_ref("g:missing:1", Some("")));
    match memory_resolver(&repo).resolve_pom(child) {
        Err(MavenError::ParentResolution {
            coordinate,
            parent,
            source,
        }) => {
            assert_eq!(coordinate, "g:child:1");
            assert_eq!(parent, "g:missing:1");
            assert!(
                matches!(*source, MavenError::PomNotFound { ref repositories, .. } if repositories == &["fixtures"]),
                "{source:?}"
            );
        }
        other => panic!("expected parent resolution error, got {other:?}"),
    }
}

#[test]
fn parent_is_read_from_relative_path() {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = temp.path();
    write_file(
        &root.join("pom.xml"),
        &pom(
            "com.test:parent:1.0",
            "<packaging>pom</packaging><properties><shared>from-parent</shared></properties>",
        ),
    );
    let module_pom = root.join("module/pom.xml");
    write_file(
        &module_pom,
        &format!(
            r#"<project>
  {}
  <artifactId>module</artifactId>
</project>"#,
            parent_ref("com.test:parent:1.0", None)
        ),
    );

    let module = RawPom::load(&module_pom).unwrap();
    let resolved = MavenResolver::new(ResolverOptions::default())
        .resolve_pom(module)
        .unwrap();
    assert_eq!(resolved.gav.to_string(), "com.test:module:1.0");
    assert_eq!(resolved.parents[0].artifact_id, "parent");
    assert_eq!(resolved.property("shared"), Some("from-parent"));
}

#[test]
fn empty_relative_path_skips_the_file_system() {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = temp.path();
    write_file(&root.join("pom.xml"), &pom("com.test:parent:1.0", ""));
    let module_pom = root.join("module/pom.xml");
    write_file(
        &module_pom,
        &format!(
            "<project>{}<artifactId>module</artifactId></project>",
            parent_ref("com.test:parent:1.0", Some(""))
        ),
    );

    let repo = Arc::new(MemoryRepository::new("fixtures"));
    let err = memory_resolver(&repo)
        .resolve_pom(RawPom::load(&module_pom).unwrap())
        .unwrap_err();
    assert!(matches!(err, MavenError::ParentResolution { .. }), "{err:?}");
}
