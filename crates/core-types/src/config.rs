//! Layered configuration: TOML file, environment, then CLI flags.
//!
//! Every field has a default so a missing config file is not an error. The CLI
//! owns the final layer (flags and `LLM_EMBEDDINGS_DB` via clap's `env`).

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Points at an alternate config file.
pub const CONFIG_ENV: &str = "LLM_INTERPOLATE_CONFIG";
/// Overrides the embeddings database location.
pub const EMBEDDINGS_DB_ENV: &str = "LLM_EMBEDDINGS_DB";
/// Overrides the `llm` user directory that holds `embeddings.db`.
pub const LLM_USER_PATH_ENV: &str = "LLM_USER_PATH";

const APP_DIR_NAME: &str = "llm-interpolate";
const LLM_APP_DIR_NAME: &str = "io.datasette.llm";
const EMBEDDINGS_DB_FILE: &str = "embeddings.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not determine a home/config directory for this user")]
    NoHomeDirectory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub interpolate: InterpolateConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Embeddings database; `None` means the `llm` user directory default.
    pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolateConfig {
    /// Number of points in a path when `-n` is not given.
    pub count: usize,
    /// Interpolation method when `--method` is not given.
    pub method: String,
}

impl Default for InterpolateConfig {
    fn default() -> Self {
        Self {
            count: 10,
            method: "linear".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a config document. Unknown keys are ignored, missing keys default.
    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Pick the embeddings database: explicit flag, then config, then the `llm` default.
    pub fn resolve_database(&self, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.store.database {
            return Ok(path.clone());
        }
        Ok(llm_user_dir()?.join(EMBEDDINGS_DB_FILE))
    }
}

/// Load configuration from `explicit`, `$LLM_INTERPOLATE_CONFIG`, or the
/// platform config directory, in that order.
///
/// An explicitly named file must exist; the platform default may be absent.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let (path, required) = match named {
        Some(path) => (path, true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(AppConfig::default()),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(raw) => AppConfig::from_toml_str(&raw, &path),
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
            Ok(AppConfig::default())
        }
        Err(source) => Err(ConfigError::Read { path, source }),
    }
}

/// `<config dir>/llm-interpolate/config.toml`, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join(APP_DIR_NAME).join("config.toml"))
}

/// Directory the `llm` tool keeps its databases in.
pub fn llm_user_dir() -> Result<PathBuf, ConfigError> {
    llm_user_dir_from(std::env::var_os(LLM_USER_PATH_ENV))
}

fn llm_user_dir_from(override_path: Option<OsString>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join(LLM_APP_DIR_NAME))
        .ok_or(ConfigError::NoHomeDirectory)
}
