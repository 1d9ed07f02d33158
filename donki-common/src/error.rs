//! Error type shared by the connector crates

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Root folder, config file or log file access
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bootstrap TOML could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored setting value does not parse as the requested type
    #[error("Setting '{key}' is invalid: {reason}")]
    InvalidSetting { key: String, reason: String },
}
