//! Error types for mspd-pd

use thiserror::Error;

/// Main error type for the station daemon
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors from the common library
    #[error(transparent)]
    Config(#[from] mspd_common::Error),

    /// Status file I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An external command could not be started
    #[error("Could not start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Volume command failed or printed something unexpected
    #[error("Volume error: {0}")]
    Volume(String),

    /// Status files are inconsistent with the station list
    #[error("{0}")]
    Status(String),

    /// Station id outside the configured list
    #[error("Unknown station {0}")]
    UnknownStation(usize),
}

/// Convenience Result type using the mspd-pd Error
pub type Result<T> = std::result::Result<T, Error>;
