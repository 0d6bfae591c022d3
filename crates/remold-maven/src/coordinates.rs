use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupArtifact {
    pub group_id: String,
    pub artifact_id: String,
}

impl GroupArtifact {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Repository path of the artifact directory, e.g. `org/slf4j/slf4j-api`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.group_id.replace('.', "/"), self.artifact_id)
    }
}

impl fmt::Display for GroupArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gav {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Gav {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Parses `groupId:artifactId:version`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split(':');
        let gav = Self::new(parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some()
            || gav.group_id.is_empty()
            || gav.artifact_id.is_empty()
            || gav.version.is_empty()
        {
            return None;
        }
        Some(gav)
    }

    pub fn group_artifact(&self) -> GroupArtifact {
        GroupArtifact::new(&self.group_id, &self.artifact_id)
    }

    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with("-SNAPSHOT")
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
}

impl Scope {
    /// The scopes a dependency forest is computed for.
    pub const RESOLVED: [Scope; 5] = [
        Scope::Compile,
        Scope::Runtime,
        Scope::Test,
        Scope::Provided,
        Scope::System,
    ];

    /// A missing scope is `compile`; an unknown one is `None`.
    pub fn parse(text: Option<&str>) -> Option<Scope> {
        match text.map(str::trim) {
            None | Some("") | Some("compile") => Some(Scope::Compile),
            Some("provided") => Some(Scope::Provided),
            Some("runtime") => Some(Scope::Runtime),
            Some("test") => Some(Scope::Test),
            Some("system") => Some(Scope::System),
            Some("import") => Some(Scope::Import),
            Some(_) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::System => "system",
            Scope::Import => "import",
        }
    }

    /// Scope of a transitive dependency declared with `transitive` below a
    /// dependency in scope `self`. `None` means it is not inherited.
    pub fn transitive(self, transitive: Scope) -> Option<Scope> {
        transitive.is_inherited().then(|| self.derive(transitive))
    }

    /// Whether a dependency POM's declaration in this scope reaches its
    /// dependents at all. Decided on the declared scope, before management.
    pub fn is_inherited(self) -> bool {
        matches!(self, Scope::Compile | Scope::Runtime | Scope::System)
    }

    /// Final scope of an inherited `child` (after management) below a
    /// dependency in scope `self`.
    pub fn derive(self, child: Scope) -> Scope {
        match (self, child) {
            (_, Scope::System | Scope::Test) => child,
            (Scope::Compile, _) => child,
            (Scope::Test | Scope::Runtime, _) => self,
            (Scope::System | Scope::Provided, _) => Scope::Provided,
            (Scope::Import, _) => Scope::Runtime,
        }
    }

    /// Whether a dependency in scope `self` belongs to the `requested` forest.
    pub fn is_in_partition(self, requested: Scope) -> bool {
        match requested {
            Scope::Compile | Scope::Provided => {
                matches!(self, Scope::Compile | Scope::Provided | Scope::System)
            }
            Scope::Runtime => matches!(self, Scope::Compile | Scope::Runtime),
            Scope::Test => !matches!(self, Scope::Import),
            Scope::System => self == Scope::System,
            Scope::Import => false,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<exclusion>`; either part may be `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl Exclusion {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        glob_part(&self.group_id, group_id) && glob_part(&self.artifact_id, artifact_id)
    }
}

fn glob_part(pattern: &str, value: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match pattern.split_once('*') {
        None => pattern == value,
        Some((prefix, suffix)) => {
            value.len() >= prefix.len() + suffix.len()
                && value.starts_with(prefix)
                && value.ends_with(suffix)
        }
    }
}
