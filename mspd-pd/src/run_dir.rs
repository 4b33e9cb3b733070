//! Status files in the run directory
//!
//! The daemon records what it started in plain text files so the state can
//! be inspected (and survives a daemon restart). The player writes the
//! current title into the tag file directly.

use crate::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Process ids of running players, one per line
pub const PID_FILE: &str = "pid";

/// Name of the playing station
pub const STATION_FILE: &str = "station";

/// URL of the playing station
pub const URL_FILE: &str = "url";

/// Current track title, written by the player
pub const TAG_FILE: &str = "tag";

/// Directory holding the status files
#[derive(Debug, Clone)]
pub struct RunDir {
    root: PathBuf,
}

impl RunDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist yet
    pub async fn ensure_exists(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Full path of a status file
    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Write `entry` as one line, appending or replacing the file
    pub async fn write_entry(&self, file: &str, entry: &str, append: bool) -> Result<()> {
        let path = self.path(file);
        let mut handle = tokio::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&path)
            .await?;
        handle.write_all(format!("{}\n", entry).as_bytes()).await?;
        handle.flush().await?;
        tracing::debug!("Wrote '{}' to {}", entry, path.display());
        Ok(())
    }

    /// Lines of a status file; a missing file has none
    pub async fn read_lines(&self, file: &str) -> Result<Vec<String>> {
        match tokio::fs::read_to_string(self.path(file)).await {
            Ok(content) => Ok(content.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a status file; a missing file is not an error
    pub async fn remove(&self, file: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path(file)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
