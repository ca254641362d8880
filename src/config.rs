//! Configuration loading and merging.
//!
//! Configuration is layered: built-in defaults, then an optional TOML
//! file, then `PATHJAIL_*` environment variables. Empty environment
//! values count as unset. Every configuration problem is fatal at
//! startup; a half-initialized jail is worse than refusing to start.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading configuration or building the
/// whitelist. All of them abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read whitelist {path}: {source}")]
    WhitelistRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("whitelist line {line} is not an absolute path: '{rule}'")]
    RelativeRule { line: usize, rule: String },

    #[error("invalid mode '{0}' (expected 'off' or 'hide')")]
    InvalidMode(String),
}

/// Enforcement mode for non-whitelisted paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Log only; never block. Lets an operator observe what a process
    /// would touch before switching enforcement on.
    #[default]
    PassThrough,
    /// Log and deny; the path appears nonexistent to the caller.
    Hide,
}

impl Mode {
    /// Parse the configured mode string. Absent, empty and `"off"`
    /// select [`Mode::PassThrough`]; `"hide"` selects [`Mode::Hide`].
    pub fn parse(value: Option<&str>) -> Result<Self, ConfigError> {
        match value {
            None | Some("") | Some("off") => Ok(Mode::PassThrough),
            Some("hide") => Ok(Mode::Hide),
            Some(other) => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

/// Raw config file schema.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    whitelist: Option<PathBuf>,
    mode: Option<String>,
    audit: AuditFile,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct AuditFile {
    path: Option<PathBuf>,
    stderr_prefix: Option<String>,
}

/// Resolved configuration for building a jail.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Rule file for the whitelist. Absent means an empty whitelist:
    /// everything is logged, and denied under [`Mode::Hide`].
    pub whitelist: Option<PathBuf>,
    /// Enforcement mode.
    pub mode: Mode,
    /// Audit log destination (one JSON object per line).
    pub audit_log: Option<PathBuf>,
    /// When set, every event is also echoed to stderr with this prefix.
    pub stderr_prefix: Option<String>,
}

impl Config {
    /// Load configuration: defaults, then the user config file, then
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let file = Self::load_file()?;
        Self::resolve(file, |key| env::var(key).ok())
    }

    /// Load the TOML config file, if one exists.
    /// `PATHJAIL_CONFIG` overrides the default location (useful for
    /// testing).
    fn load_file() -> Result<ConfigFile, ConfigError> {
        let path = match env::var("PATHJAIL_CONFIG") {
            Ok(p) if !p.is_empty() => Some(PathBuf::from(p)),
            _ => dirs::config_dir().map(|d| d.join("pathjail.toml")),
        };
        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                return Ok(toml::from_str(&content)?);
            }
        }
        Ok(ConfigFile::default())
    }

    /// Merge environment overrides into the file config. The lookup is
    /// injected so tests do not have to mutate the process environment.
    fn resolve(
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        let whitelist = non_empty(env("PATHJAIL_WHITELIST"))
            .map(PathBuf::from)
            .or(file.whitelist);
        let mode_raw = non_empty(env("PATHJAIL_MODE")).or(file.mode);
        let mode = Mode::parse(mode_raw.as_deref())?;
        let audit_log = non_empty(env("PATHJAIL_LOG"))
            .map(PathBuf::from)
            .or(file.audit.path);
        let stderr_prefix = non_empty(env("PATHJAIL_STDERR")).or(file.audit.stderr_prefix);

        Ok(Config {
            whitelist,
            mode,
            audit_log,
            stderr_prefix,
        })
    }
}
