//! Raw POM documents, exactly as written (no inheritance, no interpolation).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::coordinates::{Exclusion, Gav, GroupArtifact};
use crate::error::MavenError;
use crate::repository::RepositoryDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPom {
    /// Where a project POM was read from; `None` for downloaded POMs.
    pub source_path: Option<PathBuf>,
    pub model_version: Option<String>,
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent: Option<Parent>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<Dependency>,
    pub dependency_management: Vec<Dependency>,
    pub repositories: Vec<RepositoryDescriptor>,
    pub profiles: Vec<Profile>,
    pub modules: Vec<String>,
    pub build: Build,
    pub licenses: Vec<License>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// `None` means the default `../pom.xml`; an empty string disables the lookup.
    pub relative_path: Option<String>,
}

impl Parent {
    pub fn gav(&self) -> Gav {
        Gav::new(&self.group_id, &self.artifact_id, &self.version)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub classifier: Option<String>,
    pub type_: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub exclusions: Vec<Exclusion>,
}

/// Identity of a dependency for management lookups and conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey {
    pub group_id: String,
    pub artifact_id: String,
    /// `jar` when not declared.
    pub type_: String,
    pub classifier: Option<String>,
}

impl Dependency {
    pub fn key(&self) -> DependencyKey {
        DependencyKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            type_: self.type_or_default().to_owned(),
            classifier: self.classifier.clone(),
        }
    }

    pub fn group_artifact(&self) -> GroupArtifact {
        GroupArtifact::new(&self.group_id, &self.artifact_id)
    }

    pub fn type_or_default(&self) -> &str {
        self.type_.as_deref().unwrap_or("jar")
    }

    /// A `<scope>import</scope>` entry of type `pom` in dependencyManagement.
    pub fn is_bom_import(&self) -> bool {
        self.scope.as_deref() == Some("import") && self.type_or_default() == "pom"
    }

    pub fn coordinate(&self) -> String {
        let mut out = format!(
            "{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.version.as_deref().unwrap_or("?")
        );
        if let Some(classifier) = &self.classifier {
            out.push(':');
            out.push_str(classifier);
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub id: Option<String>,
    pub activation: Option<Activation>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<Dependency>,
    pub dependency_management: Vec<Dependency>,
    pub repositories: Vec<RepositoryDescriptor>,
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activation {
    pub active_by_default: bool,
    pub jdk: Option<String>,
    pub property: Option<ActivationProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationProperty {
    /// May start with `!` to require absence.
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Build {
    pub plugins: Vec<Plugin>,
    pub plugin_management: Vec<Plugin>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct License {
    pub name: Option<String>,
    pub url: Option<String>,
}

impl RawPom {
    /// Reads and parses a project POM from disk.
    pub fn load(path: &Path) -> Result<RawPom, MavenError> {
        let text = std::fs::read_to_string(path).map_err(|source| MavenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut pom = Self::parse_str(&text, &path.display().to_string())?;
        pom.source_path = Some(path.to_path_buf());
        Ok(pom)
    }

    /// Parses a downloaded POM. `location` only appears in errors.
    pub fn parse_bytes(bytes: &[u8], location: &str) -> Result<RawPom, MavenError> {
        let text = String::from_utf8_lossy(bytes);
        Self::parse_str(&text, location)
    }

    pub fn parse_str(text: &str, location: &str) -> Result<RawPom, MavenError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let doc = roxmltree::Document::parse(text).map_err(|source| MavenError::Xml {
            location: location.to_owned(),
            source,
        })?;

        let project = doc.root_element();
        if project.tag_name().name() != "project" {
            return Err(MavenError::MissingElement {
                location: location.to_owned(),
                element: "project",
            });
        }

        let artifact_id =
            child_text(&project, "artifactId").ok_or_else(|| MavenError::MissingElement {
                location: location.to_owned(),
                element: "artifactId",
            })?;

        let parent = match child_element(&project, "parent") {
            Some(node) => Some(parse_parent(&node, location)?),
            None => None,
        };

        let mut pom = RawPom {
            source_path: None,
            model_version: child_text(&project, "modelVersion"),
            group_id: child_text(&project, "groupId"),
            artifact_id,
            version: child_text(&project, "version"),
            packaging: child_text(&project, "packaging"),
            name: child_text(&project, "name"),
            description: child_text(&project, "description"),
            parent,
            properties: parse_properties(&project),
            dependencies: parse_dependencies(&project),
            dependency_management: parse_dependency_management(&project),
            repositories: parse_repositories(&project),
            profiles: Vec::new(),
            modules: parse_modules(&project),
            build: parse_build(&project),
            licenses: Vec::new(),
        };

        if let Some(profiles) = child_element(&project, "profiles") {
            pom.profiles = elements(&profiles, "profile").map(|n| parse_profile(&n)).collect();
        }
        if let Some(licenses) = child_element(&project, "licenses") {
            pom.licenses = elements(&licenses, "license")
                .map(|n| License {
                    name: child_text(&n, "name"),
                    url: child_text(&n, "url"),
                })
                .collect();
        }

        Ok(pom)
    }

    /// The declared groupId, or the parent's.
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// The declared version, or the parent's.
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.version.as_str()))
    }

    pub fn group_artifact(&self) -> Option<GroupArtifact> {
        Some(GroupArtifact::new(self.effective_group_id()?, &self.artifact_id))
    }

    /// Uninterpolated `groupId:artifactId:version`, for messages.
    pub fn coordinate(&self) -> String {
        format!(
            "{}:{}:{}",
            self.effective_group_id().unwrap_or("?"),
            self.artifact_id,
            self.effective_version().unwrap_or("?")
        )
    }
}

fn parse_parent(node: &roxmltree::Node<'_, '_>, location: &str) -> Result<Parent, MavenError> {
    let required = |name: &'static str, element: &'static str| {
        child_text(node, name).ok_or_else(|| MavenError::MissingElement {
            location: location.to_owned(),
            element,
        })
    };
    Ok(Parent {
        group_id: required("groupId", "parent/groupId")?,
        artifact_id: required("artifactId", "parent/artifactId")?,
        version: required("version", "parent/version")?,
        // An empty `<relativePath/>` is meaningful, so keep it.
        relative_path: child_element(node, "relativePath")
            .map(|n| n.text().map(str::trim).unwrap_or_default().to_owned()),
    })
}

fn parse_properties(node: &roxmltree::Node<'_, '_>) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();
    if let Some(props_node) = child_element(node, "properties") {
        for child in props_node.children().filter(|n| n.is_element()) {
            let key = child.tag_name().name().to_string();
            let value = child.text().map(str::trim).unwrap_or_default();
            properties.insert(key, value.to_string());
        }
    }
    properties
}

fn parse_dependency_management(node: &roxmltree::Node<'_, '_>) -> Vec<Dependency> {
    child_element(node, "dependencyManagement")
        .map(|mgmt| parse_dependencies(&mgmt))
        .unwrap_or_default()
}

fn parse_dependencies(node: &roxmltree::Node<'_, '_>) -> Vec<Dependency> {
    let Some(deps_node) = child_element(node, "dependencies") else {
        return Vec::new();
    };
    elements(&deps_node, "dependency")
        .filter_map(|dep_node| {
            let group_id = child_text(&dep_node, "groupId")?;
            let artifact_id = child_text(&dep_node, "artifactId")?;
            let exclusions = child_element(&dep_node, "exclusions")
                .map(|ex| {
                    elements(&ex, "exclusion")
                        .filter_map(|n| {
                            Some(Exclusion::new(
                                child_text(&n, "groupId")?,
                                child_text(&n, "artifactId").unwrap_or_else(|| "*".into()),
                            ))
                        })
                        .collect()
                })
                .unwrap_or_default();

            Some(Dependency {
                group_id,
                artifact_id,
                version: child_text(&dep_node, "version"),
                classifier: child_text(&dep_node, "classifier"),
                type_: child_text(&dep_node, "type"),
                scope: child_text(&dep_node, "scope"),
                optional: child_text(&dep_node, "optional").as_deref() == Some("true"),
                exclusions,
            })
        })
        .collect()
}

fn parse_repositories(node: &roxmltree::Node<'_, '_>) -> Vec<RepositoryDescriptor> {
    let Some(repos) = child_element(node, "repositories") else {
        return Vec::new();
    };
    elements(&repos, "repository")
        .filter_map(|repo| {
            let url = child_text(&repo, "url")?;
            let policy = |name: &str| {
                child_element(&repo, name)
                    .and_then(|n| child_text(&n, "enabled"))
                    .map_or(true, |enabled| enabled != "false")
            };
            Some(RepositoryDescriptor {
                id: child_text(&repo, "id").unwrap_or_else(|| url.clone()),
                url,
                releases: policy("releases"),
                snapshots: policy("snapshots"),
                username: None,
                password: None,
            })
        })
        .collect()
}

fn parse_modules(node: &roxmltree::Node<'_, '_>) -> Vec<String> {
    child_element(node, "modules")
        .map(|modules_node| {
            elements(&modules_node, "module")
                .filter_map(|n| n.text())
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn parse_build(node: &roxmltree::Node<'_, '_>) -> Build {
    let Some(build) = child_element(node, "build") else {
        return Build::default();
    };
    Build {
        plugins: parse_plugins(&build),
        plugin_management: child_element(&build, "pluginManagement")
            .map(|pm| parse_plugins(&pm))
            .unwrap_or_default(),
    }
}

fn parse_plugins(node: &roxmltree::Node<'_, '_>) -> Vec<Plugin> {
    child_element(node, "plugins")
        .map(|plugins| {
            elements(&plugins, "plugin")
                .filter_map(|p| {
                    Some(Plugin {
                        group_id: child_text(&p, "groupId")
                            .unwrap_or_else(|| "org.apache.maven.plugins".into()),
                        artifact_id: child_text(&p, "artifactId")?,
                        version: child_text(&p, "version"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_profile(node: &roxmltree::Node<'_, '_>) -> Profile {
    let activation = child_element(node, "activation").map(|activation| Activation {
        active_by_default: child_text(&activation, "activeByDefault").as_deref() == Some("true"),
        jdk: child_text(&activation, "jdk"),
        property: child_element(&activation, "property").and_then(|property| {
            Some(ActivationProperty {
                name: child_text(&property, "name")?,
                value: child_text(&property, "value"),
            })
        }),
    });
    Profile {
        id: child_text(node, "id"),
        activation,
        properties: parse_properties(node),
        dependencies: parse_dependencies(node),
        dependency_management: parse_dependency_management(node),
        repositories: parse_repositories(node),
        modules: parse_modules(node),
    }
}

fn elements<'a, 'input>(
    node: &roxmltree::Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.has_tag_name(name))
}

fn child_element<'a, 'input>(
    node: &roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

pub(crate) fn child_text(node: &roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    child_element(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
