//! # MSPD Station Daemon Library (mspd-pd)
//!
//! Controls a station player over a line-based TCP protocol.
//!
//! **Purpose:** keep a list of configured stations, start and stop one
//! `mspd-ps` player process at a time, and report what is playing.
//!
//! **Architecture:** [`server`] accepts connections and parses requests with
//! [`protocol`]; requests run against a [`protocol::StationControl`], which the
//! [`backend::Backend`] implements with child processes and the status files
//! in [`run_dir`].

pub mod backend;
pub mod error;
pub mod protocol;
pub mod run_dir;
pub mod server;
pub mod stations;

pub use error::{Error, Result};
