//! Common error types for MSPD

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for MSPD operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the MSPD binaries
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
