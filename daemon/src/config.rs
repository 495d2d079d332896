//! Daemon configuration with TOML file support.

use std::path::{Path, PathBuf};

use flash_types::TokenParams;
use flash_utils::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(String),
}

/// Configuration for `flashd`.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`]; CLI flags
/// and `FLASH_*` environment variables override individual fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Where the ledger snapshot lives.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Where submitted operations are recorded.
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Lifetime of a mint when neither `--expires-at` nor `--ttl` is given.
    #[serde(default = "default_mint_ttl_secs")]
    pub default_mint_ttl_secs: u64,

    /// Token metadata used by `init`.
    #[serde(default)]
    pub token: TokenParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_state_file() -> PathBuf {
    PathBuf::from("./flash_state.bin")
}

fn default_history_file() -> PathBuf {
    PathBuf::from("./flash_history.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_mint_ttl_secs() -> u64 {
    86_400
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            history_file: default_history_file(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            default_mint_ttl_secs: default_mint_ttl_secs(),
            token: TokenParams::default(),
        }
    }
}
