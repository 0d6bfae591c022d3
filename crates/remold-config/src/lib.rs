//! Configuration for remold.
//!
//! A single TOML document carries the Maven resolver settings (`[maven]`) and
//! the logging setup (`[logging]`). Every key is optional.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once, OnceLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoldConfig {
    #[serde(default)]
    pub maven: MavenConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RemoldConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MavenConfig {
    /// Never contact remote repositories.
    #[serde(default)]
    pub offline: bool,

    /// Maven local repository. `~` expands to the home directory.
    #[serde(default)]
    pub local_repository: Option<String>,

    /// Profile ids activated explicitly, as with `mvn -P`.
    #[serde(default)]
    pub active_profiles: Vec<String>,

    /// JDK version used for `<activation><jdk>` matching.
    #[serde(default)]
    pub jdk_version: Option<String>,

    #[serde(default = "MavenConfig::default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "MavenConfig::default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// User properties (`-Dname=value`). They take precedence over model properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Repositories consulted in addition to the ones declared by POMs.
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,

    #[serde(default)]
    pub mirrors: Vec<MirrorConfig>,

    #[serde(default)]
    pub credentials: Vec<CredentialsConfig>,

    /// Dated versions to use for `-SNAPSHOT` coordinates without metadata.
    #[serde(default)]
    pub pinned_snapshots: Vec<PinnedSnapshot>,
}

impl MavenConfig {
    fn default_connect_timeout_ms() -> u64 {
        5_000
    }

    fn default_read_timeout_ms() -> u64 {
        30_000
    }

    /// The local repository with `~` expanded, falling back to `~/.m2/repository`.
    pub fn local_repository_path(&self) -> Option<PathBuf> {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from);
        match self.local_repository.as_deref() {
            Some(path) => match path.strip_prefix("~/") {
                Some(rest) => home.map(|home| home.join(rest)),
                None if path == "~" => home,
                None => Some(PathBuf::from(path)),
            },
            None => home.map(|home| home.join(".m2").join("repository")),
        }
    }
}

impl Default for MavenConfig {
    fn default() -> Self {
        Self {
            offline: false,
            local_repository: None,
            active_profiles: Vec::new(),
            jdk_version: None,
            connect_timeout_ms: Self::default_connect_timeout_ms(),
            read_timeout_ms: Self::default_read_timeout_ms(),
            properties: BTreeMap::new(),
            repositories: Vec::new(),
            mirrors: Vec::new(),
            credentials: Vec::new(),
            pinned_snapshots: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub id: String,
    pub url: String,
    #[serde(default = "default_true")]
    pub releases: bool,
    #[serde(default = "default_true")]
    pub snapshots: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    pub id: String,
    pub url: String,
    /// `*`, `external:*`, a comma separated id list, or `!id` exclusions.
    pub mirror_of: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Repository or mirror id the credentials apply to.
    pub id: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedSnapshot {
    /// `groupId:artifactId:version`, the version ending in `-SNAPSHOT`.
    pub coordinate: String,
    pub dated_version: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or an `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Write logs to this file instead of stderr.
    ///
    /// If the file cannot be opened, logs go to stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    /// `level` as filter directives; bare level names are case-insensitive.
    pub(crate) fn directives(&self) -> String {
        let level = self.level.trim();
        if level.is_empty() {
            return Self::default_level();
        }
        let lowered = level.to_ascii_lowercase();
        match lowered.as_str() {
            "warning" => "warn".to_owned(),
            "trace" | "debug" | "info" | "warn" | "error" => lowered,
            _ => level.to_owned(),
        }
    }

    /// The effective `EnvFilter`. `RUST_LOG`, when set, is merged after the
    /// configured directives; invalid directives fall back to `info`.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let rust_log = std::env::var("RUST_LOG").ok();
        self.filter_candidates(rust_log.as_deref())
            .iter()
            .find_map(|directives| tracing_subscriber::EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| {
                tracing_subscriber::EnvFilter::default()
                    .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
            })
    }

    /// Directive strings to try, in order: configured plus `rust_log`, then
    /// `rust_log` alone, then the configured ones.
    pub(crate) fn filter_candidates(&self, rust_log: Option<&str>) -> Vec<String> {
        let configured = self.directives();
        let mut candidates = Vec::with_capacity(3);
        if let Some(env) = rust_log.map(str::trim).filter(|value| !value.is_empty()) {
            candidates.push(format!("{configured},{env}"));
            candidates.push(env.to_owned());
        }
        candidates.push(configured);
        candidates
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The `Display` impl includes a source snippet, which may contain credentials.
        ConfigError::Toml(redact_quoted(err.message()))
    }
}

fn redact_quoted(message: &str) -> String {
    static QUOTED_STRING_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = QUOTED_STRING_RE.get_or_init(|| {
        regex::Regex::new(r#""(?:\\.|[^"\\])*""#).expect("quoted-string regex should compile")
    });
    re.replace_all(message, r#""<redacted>""#).into_owned()
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber.
///
/// Only the first call installs anything. Returns `true` if this call did.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let mut installed = false;
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let mut unopened = None;
        let writer = match config.file.as_ref().map(|path| {
            (path, OpenOptions::new().create(true).append(true).open(path))
        }) {
            Some((_, Ok(file))) => BoxMakeWriter::new(Mutex::new(file)),
            Some((path, Err(err))) => {
                unopened = Some((path, err));
                BoxMakeWriter::new(std::io::stderr)
            }
            None => BoxMakeWriter::new(std::io::stderr),
        };

        let result = if config.json {
            tracing::subscriber::set_global_default(
                tracing_subscriber::registry().with(filter).with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_ansi(false),
                ),
            )
        } else {
            tracing::subscriber::set_global_default(
                tracing_subscriber::registry().with(filter).with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                ),
            )
        };
        installed = result.is_ok();
        if installed {
            tracing::debug!(target: "remold.config", json = config.json, "tracing initialized");
        }
        if let Some((path, err)) = unopened {
            if installed {
                tracing::warn!(
                    target: "remold.config",
                    path = %path.display(),
                    error = %err,
                    "failed to open log file; logging to stderr"
                );
            } else {
                eprintln!("remold: failed to open log file {}: {err}", path.display());
            }
        }
    });
    installed
}
