use std::sync::Arc;

use pretty_assertions::assert_eq;
use remold_maven::{print_dependency_tree, GroupArtifact, MemoryRepository, Scope};

use super::support::{dep, dependencies, management, memory_resolver, project, publish};

fn metadata(versions: &[&str]) -> String {
    let versions: String = versions
        .iter()
        .map(|v| format!("<version>{v}</version>"))
        .collect();
    format!("<metadata><versioning><versions>{versions}</versions></versioning></metadata>")
}

#[test]
fn star_exclusion_prunes_the_whole_subtree() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(&repo, "g:a:1", &dependencies(&[dep("g:c:1", "")]));
    publish(&repo, "g:b:1", &dependencies(&[dep("g:d:1", "")]));
    publish(&repo, "g:c:1", &dependencies(&[dep("g:e:1", "")]));
    publish(&repo, "g:d:1", "");

    let exclude_all =
        "<exclusions><exclusion><groupId>*</groupId><artifactId>*</artifactId></exclusion></exclusions>";
    let app = project(
        "g:app:1",
        &dependencies(&[dep("g:a:1", exclude_all), dep("g:b:1", "")]),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();

    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Compile)),
        "g:a:1\ng:b:1\n g:d:1\n"
    );
    assert!(result.find(Scope::Test, "g", "c").is_none());
    assert!(result.find(Scope::Test, "g", "e").is_none());
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn group_wildcard_exclusions_accumulate_down_the_tree() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(&repo, "g:a:1", &dependencies(&[dep("g:mid:1", "")]));
    publish(
        &repo,
        "g:mid:1",
        &dependencies(&[dep("org.unwanted:x:1", ""), dep("g:kept:1", "")]),
    );
    publish(&repo, "g:kept:1", "");

    let app = project(
        "g:app:1",
        &dependencies(&[dep(
            "g:a:1",
            "<exclusions><exclusion><groupId>org.unwanted</groupId><artifactId>*</artifactId></exclusion></exclusions>",
        )]),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();
    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Compile)),
        "g:a:1\n g:mid:1\n  g:kept:1\n"
    );
}

#[test]
fn nearest_then_first_declared_wins() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(&repo, "g:a:1", &dependencies(&[dep("g:c:1", ""), dep("g:x:1", "")]));
    publish(&repo, "g:b:1", &dependencies(&[dep("g:d:1", ""), dep("g:x:2", "")]));
    publish(&repo, "g:c:1", &dependencies(&[dep("g:d:2", "")]));
    for leaf in ["g:d:1", "g:d:2", "g:x:1", "g:x:2"] {
        publish(&repo, leaf, "");
    }

    let app = project(
        "g:app:1",
        &dependencies(&[dep("g:a:1", ""), dep("g:b:1", "")]),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();
    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Compile)),
        "g:a:1\n g:c:1\n g:x:1\ng:b:1\n g:d:1\n"
    );
    let d = result.find(Scope::Compile, "g", "d").unwrap();
    assert_eq!(d.depth, 1);
    assert_eq!(d.gav.version, "1");
}

#[test]
fn scopes_follow_the_transitivity_matrix() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(
        &repo,
        "g:comp:1",
        &dependencies(&[
            dep("g:rc:1", "<scope>runtime</scope>"),
            dep("g:tc:1", "<scope>test</scope>"),
            dep("g:pc:1", "<scope>provided</scope>"),
        ]),
    );
    publish(&repo, "g:tst:1", &dependencies(&[dep("g:cc:1", "")]));
    for leaf in ["g:prov:1", "g:run:1", "g:rc:1", "g:cc:1", "g:tc:1", "g:pc:1"] {
        publish(&repo, leaf, "");
    }

    let app = project(
        "g:app:1",
        &dependencies(&[
            dep("g:comp:1", ""),
            dep("g:prov:1", "<scope>provided</scope>"),
            dep("g:run:1", "<scope>runtime</scope>"),
            dep("g:tst:1", "<scope>test</scope>"),
        ]),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();

    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Compile)),
        "g:comp:1\ng:prov:1\n"
    );
    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Provided)),
        "g:comp:1\ng:prov:1\n"
    );
    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Runtime)),
        "g:comp:1\n g:rc:1\ng:run:1\n"
    );
    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Test)),
        "g:comp:1\n g:rc:1\ng:prov:1\ng:run:1\ng:tst:1\n g:cc:1\n"
    );
    assert!(result.dependencies(Scope::System).is_empty());

    assert_eq!(result.find(Scope::Test, "g", "cc").unwrap().scope, Scope::Test);
    assert_eq!(result.find(Scope::Runtime, "g", "rc").unwrap().scope, Scope::Runtime);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn system_dependencies_are_not_expanded() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(&repo, "g:sys:1", &dependencies(&[dep("g:never:1", "")]));

    let app = project(
        "g:app:1",
        &dependencies(&[dep("g:sys:1", "<scope>system</scope>")]),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();
    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::System)),
        "g:sys:1\n"
    );
    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Compile)),
        "g:sys:1\n"
    );
    assert!(result.dependencies(Scope::Runtime).is_empty());
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn optional_transitive_dependencies_are_dropped() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(
        &repo,
        "g:a:1",
        &dependencies(&[dep("g:opt:1", "<optional>true</optional>"), dep("g:req:1", "")]),
    );
    publish(&repo, "g:req:1", "");
    publish(&repo, "g:direct-opt:1", "");

    let app = project(
        "g:app:1",
        &dependencies(&[
            dep("g:a:1", ""),
            dep("g:direct-opt:1", "<optional>true</optional>"),
        ]),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();

    let direct = result.find(Scope::Compile, "g", "direct-opt").unwrap();
    assert!(direct.optional);
    assert!(result.find(Scope::Compile, "g", "opt").is_none());
    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Compile)),
        "g:a:1\n g:req:1\n"
    );
}

#[test]
fn root_management_overrides_transitive_versions() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(&repo, "g:a:1", &dependencies(&[dep("g:c:1.0", "")]));
    publish(&repo, "g:c:2.0", "");

    let app = project(
        "g:app:1",
        &format!(
            "{}{}",
            management(&[dep("g:c:2.0", "")]),
            dependencies(&[dep("g:a:1", "")])
        ),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();
    let c = result.find(Scope::Compile, "g", "c").unwrap();
    assert_eq!(c.gav.version, "2.0");
    assert_eq!(c.requested.version.as_deref(), Some("2.0"));
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn managed_scopes_apply_after_selection() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(
        &repo,
        "g:a:1",
        &dependencies(&[
            dep("g:x:1", ""),
            dep("g:y:1", ""),
            dep("g:z:1", "<scope>test</scope>"),
            dep("g:s:1", "<scope>system</scope>"),
        ]),
    );
    for leaf in ["g:x:1", "g:y:1", "g:z:1"] {
        publish(&repo, leaf, "");
    }

    // z is declared `test` by its POM, so managing it to `compile` does not
    // bring it back.
    let app = project(
        "g:app:1",
        &format!(
            "{}{}",
            management(&[
                dep("g:x:1", "<scope>provided</scope>"),
                dep("g:y:1", "<scope>test</scope>"),
                dep("g:z:1", "<scope>compile</scope>"),
            ]),
            dependencies(&[dep("g:a:1", "")])
        ),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();

    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Compile)),
        "g:a:1\n g:s:1\n g:x:1\n"
    );
    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Test)),
        "g:a:1\n g:s:1\n g:x:1\n g:y:1\n"
    );
    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Runtime)),
        "g:a:1\n"
    );
    assert_eq!(result.find(Scope::Compile, "g", "x").unwrap().scope, Scope::Provided);
    assert_eq!(result.find(Scope::Test, "g", "y").unwrap().scope, Scope::Test);
    assert_eq!(result.find(Scope::Test, "g", "s").unwrap().scope, Scope::System);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn test_jar_and_jar_of_one_artifact_are_distinct() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(&repo, "g:lib:1", "");
    publish(&repo, "g:lib:2", "");

    let app = project(
        "g:app:1",
        &format!(
            "{}{}",
            management(&[
                dep("g:lib:1", ""),
                dep("g:lib:2", "<type>test-jar</type>"),
            ]),
            dependencies(&[
                dep("g:lib", ""),
                dep("g:lib", "<type>test-jar</type><scope>test</scope>"),
            ])
        ),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();

    let libs: Vec<(&str, &str)> = result
        .dependencies(Scope::Test)
        .iter()
        .map(|node| (node.type_.as_str(), node.gav.version.as_str()))
        .collect();
    assert_eq!(libs, vec![("jar", "1"), ("test-jar", "2")]);
    assert_eq!(result.pom.managed_version("g", "lib"), Some("1"));
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn missing_dependencies_are_recorded_and_siblings_proceed() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(&repo, "g:b:1", "");

    let app = project(
        "g:app:1",
        &dependencies(&[dep("g:missing:1", ""), dep("g:b:1", ""), dep("g:unversioned", "")]),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();

    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Compile)),
        "g:b:1\n"
    );
    let coordinates: Vec<&str> = result.errors.iter().map(|e| e.coordinate.as_str()).collect();
    assert_eq!(coordinates, vec!["g:missing:1", "g:unversioned:?"]);
    assert!(result.errors[0].message.contains("fixtures"), "{}", result.errors[0]);
}

#[test]
fn ranges_and_dynamic_versions_use_metadata() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    repo.insert_metadata(
        &GroupArtifact::new("g", "ranged"),
        None,
        &metadata(&["1.0", "1.5", "2.0"]),
    );
    repo.insert_metadata(
        &GroupArtifact::new("g", "latest"),
        None,
        &metadata(&["1.0", "3.0", "3.1-SNAPSHOT"]),
    );
    for published in ["g:ranged:1.5", "g:latest:3.0"] {
        publish(&repo, published, "");
    }

    let app = project(
        "g:app:1",
        &dependencies(&[dep("g:ranged:[1.0,2.0)", ""), dep("g:latest:RELEASE", "")]),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();

    assert_eq!(
        print_dependency_tree(result.dependencies(Scope::Compile)),
        "g:latest:3.0\ng:ranged:1.5\n"
    );
    let ranged = result.find(Scope::Compile, "g", "ranged").unwrap();
    assert_eq!(ranged.requested.version.as_deref(), Some("[1.0,2.0)"));
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn unsatisfiable_range_is_a_dependency_error() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    repo.insert_metadata(&GroupArtifact::new("g", "old"), None, &metadata(&["0.9"]));

    let app = project("g:app:1", &dependencies(&[dep("g:old:[1.0,)", "")]));
    let result = memory_resolver(&repo).resolve(app).unwrap();
    assert!(result.dependencies(Scope::Compile).is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("[1.0,)"), "{}", result.errors[0]);
}

#[test]
fn computed_tree_matches_oracle() {
    let repo = Arc::new(MemoryRepository::new("fixtures"));
    publish(
        &repo,
        "org.web:server:4.1",
        &dependencies(&[
            dep("org.web:codec:4.1", ""),
            dep("org.net:transport:4.1", ""),
            dep("org.web:server-tests:4.1", "<scope>test</scope>"),
        ]),
    );
    publish(
        &repo,
        "org.net:transport:4.1",
        &dependencies(&[
            dep("org.net:native:4.1", "<classifier>linux-x86_64</classifier>"),
            dep("org.log:api:1.7", ""),
        ]),
    );
    publish(&repo, "org.log:api:1.7", "");
    publish(&repo, "org.log:api:2.0", "");
    publish(&repo, "org.web:codec:4.1", "");
    publish(&repo, "org.net:native:4.1", "");
    publish(&repo, "junit:junit:4.13", "");

    let app = project(
        "com.acme:service:1.0",
        &dependencies(&[
            dep("org.web:server:4.1", ""),
            dep("org.log:api:2.0", ""),
            dep("junit:junit:4.13", "<scope>test</scope>"),
        ]),
    );
    let result = memory_resolver(&repo).resolve(app).unwrap();

    let oracle = "\
org.log:api:2.0
org.web:server:4.1
 org.net:transport:4.1
  org.net:native:4.1:linux-x86_64
 org.web:codec:4.1
";
    assert_eq!(print_dependency_tree(result.dependencies(Scope::Compile)), oracle);

    let test_oracle = "\
junit:junit:4.13
org.log:api:2.0
org.web:server:4.1
 org.net:transport:4.1
  org.net:native:4.1:linux-x86_64
 org.web:codec:4.1
";
    assert_eq!(print_dependency_tree(result.dependencies(Scope::Test)), test_oracle);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}
