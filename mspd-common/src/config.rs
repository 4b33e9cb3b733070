//! Configuration loading and config file resolution
//!
//! One TOML file configures both binaries. Every key is optional; a missing
//! file is not an error unless it was named explicitly.
//!
//! # File Resolution Priority
//!
//! 1. `--config` argument or `MSPD_CONFIG` environment variable (must exist)
//! 2. `<user config dir>/mspd/config.toml`
//! 3. `/etc/mspd/config.toml` (Unix only)
//! 4. Built-in defaults

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name used under the platform config/runtime directories
pub const APP_DIR_NAME: &str = "mspd";

/// Complete configuration file contents
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Stream player (`mspd-ps`) settings
    pub player: PlayerConfig,

    /// Station daemon (`mspd-pd`) settings
    pub daemon: DaemonConfig,

    /// Station definitions keyed by short name
    ///
    /// Only stations listed in [`DaemonConfig::stations`] are offered to clients.
    pub stations: HashMap<String, StationEntry>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Stream player settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Timeout for each playlist HTTP request
    pub http_timeout_secs: u64,

    /// User-Agent header sent while resolving playlists
    pub user_agent: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: 10,
            user_agent: concat!("mspd/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Station daemon settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Address the control protocol listens on
    pub listen: String,

    /// Directory holding the pid/station/url/tag status files
    pub run_dir: PathBuf,

    /// Player command started for each station
    pub player: String,

    /// External command that reports and changes the output volume
    pub volume_command: String,

    /// Ordered station keys; station ids are assigned from 1 in this order
    pub stations: Vec<String>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            run_dir: default_run_dir(),
            player: "mspd-ps".to_string(),
            volume_command: "chvol".to_string(),
            stations: Vec::new(),
        }
    }
}

/// A single station definition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StationEntry {
    /// Display name
    pub name: String,

    /// Stream or playlist URI handed to the player
    pub url: String,
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path named on the command line or in the environment
    Explicit(PathBuf),

    /// Path found in one of the default locations
    Discovered(PathBuf),

    /// No file found; built-in defaults in use
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Explicit(path) => write!(f, "{}", path.display()),
            ConfigSource::Discovered(path) => write!(f, "{} (discovered)", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Get OS-dependent default run directory
fn default_run_dir() -> PathBuf {
    dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME))
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| Error::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(path, &content)
    }

    /// Resolve and load the configuration file
    ///
    /// An explicit path that cannot be read is an error. When no explicit path
    /// is given and no default file exists, built-in defaults are returned.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            let config = Self::load(path)?;
            return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
        }

        match default_config_locations().into_iter().find(|p| p.exists()) {
            Some(path) => {
                let config = Self::load(&path)?;
                Ok((config, ConfigSource::Discovered(path)))
            }
            None => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }
}

/// Candidate configuration file paths, highest priority first
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    if cfg!(unix) {
        locations.push(PathBuf::from("/etc").join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    locations
}
