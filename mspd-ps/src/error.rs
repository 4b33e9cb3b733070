//! Error types for mspd-ps
//!
//! Every fallible boundary (HTTP fetch, playlist parse, tag write, playback
//! engine) has its own variant so callers can decide to log and continue.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the stream player
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors from the common library
    #[error(transparent)]
    Config(#[from] mspd_common::Error),

    /// HTTP request failed (transport error or non-success status)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Playlist document could not be parsed
    #[error("Playlist parse error: {0}")]
    Playlist(String),

    /// Tag file could not be written
    #[error("Failed to write tag file {path}: {source}")]
    TagWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Playback engine errors
    #[error("Playback error: {0}")]
    Playback(String),
}

/// Convenience Result type using the mspd-ps Error
pub type Result<T> = std::result::Result<T, Error>;
