//! # MSPD Common Library
//!
//! Shared code for the MSPD binaries:
//! - Error type for configuration loading
//! - TOML configuration (player, daemon, stations, logging)
//! - Tracing subscriber initialisation
//! - Shutdown signal handling

pub mod config;
pub mod error;
pub mod logging;
pub mod shutdown;

pub use config::{ConfigSource, TomlConfig};
pub use error::{Error, Result};
