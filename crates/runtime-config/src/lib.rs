//! Viewer configuration types.
//!
//! `ragview.toml` holds display and logging preferences. Every field has a
//! serde default, so a partial (or missing) file yields a usable config.
//! Command-line overrides are applied by the TUI crate on top of this.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "ragview.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ViewerConfig {
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    /// Rewrite arrays as index-keyed objects in evidence panels.
    #[serde(default = "default_true")]
    pub show_array_indexes: bool,
    /// Tree levels expanded when a panel opens; 1 expands the root only.
    #[serde(default = "default_expand_depth")]
    pub expand_depth: usize,
    #[serde(default)]
    pub time_zone: TimeZoneSetting,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_array_indexes: true,
            expand_depth: default_expand_depth(),
            time_zone: TimeZoneSetting::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeZoneSetting {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// Default tracing directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file. Without one, `--dump` logs to stderr and the viewer
    /// discards logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

fn default_true() -> bool {
    true
}
fn default_expand_depth() -> usize {
    1
}
fn default_log_level() -> String {
    "warn".to_string()
}

/// Read and parse a config file.
pub fn load_config(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`load_config`], but a missing file yields defaults.
pub fn load_or_default(path: &Path) -> Result<ViewerConfig, ConfigError> {
    if !path.exists() {
        return Ok(ViewerConfig::default());
    }
    load_config(path)
}
