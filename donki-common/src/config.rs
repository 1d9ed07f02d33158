//! Bootstrap configuration loading and root folder resolution
//!
//! Configuration is read once at startup from a TOML file. A missing file is
//! not an error: the connector starts with built-in defaults and logs a
//! warning.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default upstream endpoint for coronal mass ejection events
pub const DEFAULT_ENDPOINT: &str = "https://api.nasa.gov/DONKI/CME";

/// Default HTTP port for the host-facing API
pub const DEFAULT_PORT: u16 = 5731;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "DONKI_CONFIG";

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV_VAR: &str = "DONKI_ROOT_FOLDER";

/// Database file created inside the root folder
pub const DATABASE_FILE: &str = "donki.db";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the settings database
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Host-facing API port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream CME endpoint, without query string
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key used to seed the credential store when it is empty
    #[serde(default)]
    pub api_key: Option<String>,

    /// Report the host user as an admin (extra diagnostics in the host)
    #[serde(default)]
    pub admin_mode: bool,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            logging: LoggingConfig::default(),
            port: default_port(),
            endpoint: default_endpoint(),
            api_key: None,
            admin_mode: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Load bootstrap configuration, falling back to defaults
///
/// **Search order:**
/// 1. `DONKI_CONFIG` environment variable
/// 2. `~/.config/donki/config.toml`
/// 3. `/etc/donki/config.toml` (Linux only)
///
/// A file that exists but fails to parse is an error; no file at all is not.
pub fn load_config() -> Result<TomlConfig> {
    match find_config_file() {
        Some(path) => {
            let config = load_toml_config(&path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => {
            warn!("No config file found, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Locate the config file for the platform
fn find_config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        warn!("{} points at missing file {}", CONFIG_ENV_VAR, path.display());
    }

    let user_config = dirs::config_dir().map(|d| d.join("donki").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/donki/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the root folder
///
/// **Priority:** environment variable, then TOML, then the OS default.
pub fn resolve_root_folder(config: &TomlConfig) -> PathBuf {
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("donki"))
        .unwrap_or_else(|| PathBuf::from("./donki_data"))
}

/// Create the root folder if missing and return the database path inside it
pub fn prepare_root_folder(root_folder: &Path) -> Result<PathBuf> {
    if !root_folder.exists() {
        std::fs::create_dir_all(root_folder)?;
        info!("Created root folder {}", root_folder.display());
    }
    Ok(root_folder.join(DATABASE_FILE))
}
