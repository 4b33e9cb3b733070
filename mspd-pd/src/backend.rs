//! Station playback backend
//!
//! Starts one player process per station and records it in the run
//! directory. Volume is delegated to an external command that prints the
//! current volume when called without arguments and accepts
//! `set|inc|dec <n>`.

use crate::protocol::{StationControl, Status, VolumeChange};
use crate::run_dir::{RunDir, PID_FILE, STATION_FILE, TAG_FILE, URL_FILE};
use crate::stations::StationTable;
use crate::{Error, Result};
use mspd_common::config::DaemonConfig;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Process-backed [`StationControl`]
pub struct Backend {
    stations: StationTable,
    run_dir: RunDir,
    player: String,
    volume_command: String,
    child: Option<Child>,
}

impl Backend {
    pub fn new(stations: StationTable, config: &DaemonConfig) -> Self {
        Self {
            stations,
            run_dir: RunDir::new(&config.run_dir),
            player: config.player.clone(),
            volume_command: config.volume_command.clone(),
            child: None,
        }
    }

    pub fn run_dir(&self) -> &RunDir {
        &self.run_dir
    }

    /// Read the current volume from the volume command
    pub async fn volume(&self) -> Result<i32> {
        let output = Command::new(&self.volume_command)
            .output()
            .await
            .map_err(|source| Error::Spawn {
                command: self.volume_command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::Volume(format!(
                "'{}' exited with {}",
                self.volume_command, output.status
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        text.trim()
            .parse()
            .map_err(|_| Error::Volume(format!("unexpected volume output '{}'", text.trim())))
    }

    async fn read_status(&self, with_volume: bool) -> Result<Status> {
        let pids = self.run_dir.read_lines(PID_FILE).await?;
        if pids.is_empty() {
            return Ok(Status::idle());
        }

        let names = self.run_dir.read_lines(STATION_FILE).await?;
        let urls = self.run_dir.read_lines(URL_FILE).await?;
        let (Some(name), Some(url)) = (names.first(), urls.first()) else {
            return Err(Error::Status("Could not get station name.".to_string()));
        };

        let station_id = self.stations.find(name, url).ok_or_else(|| {
            Error::Status(
                "Currently playing station name does not match any name in config.".to_string(),
            )
        })?;

        let volume = if with_volume {
            match self.volume().await {
                Ok(volume) => Some(volume),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            }
        } else {
            None
        };

        let tag = self
            .run_dir
            .read_lines(TAG_FILE)
            .await?
            .into_iter()
            .next()
            .unwrap_or_default();

        Ok(Status {
            station_id,
            station: self.stations.get(station_id).cloned(),
            tag,
            volume,
        })
    }

    /// Forget our player if it has exited on its own
    fn reap_exited_player(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                warn!("Player exited unexpectedly: {}", status);
                self.child = None;
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to check player: {}", e),
        }
    }

    async fn stop_players(&mut self) -> Result<()> {
        let own_pid = match self.child.take() {
            Some(mut child) => {
                let pid = child.id();
                if let Err(e) = child.start_kill() {
                    debug!("Player already gone: {}", e);
                }
                match child.wait().await {
                    Ok(status) => debug!("Player exited: {}", status),
                    Err(e) => warn!("Failed to reap player: {}", e),
                }
                pid
            }
            None => None,
        };

        // Players started by an earlier daemon run are only known by pid
        for pid in self.run_dir.read_lines(PID_FILE).await? {
            if own_pid.map(|own| own.to_string()) == Some(pid.clone()) {
                continue;
            }
            kill_stale_player(&pid).await;
        }

        self.run_dir.write_entry(TAG_FILE, "", false).await?;
        self.run_dir.remove(PID_FILE).await
    }
}

impl StationControl for Backend {
    fn stations(&self) -> &StationTable {
        &self.stations
    }

    async fn status(&mut self, with_volume: bool) -> Result<Status> {
        self.reap_exited_player();
        self.read_status(with_volume).await
    }

    async fn play(&mut self, id: usize) -> Result<()> {
        let station = self
            .stations
            .get(id)
            .cloned()
            .ok_or(Error::UnknownStation(id))?;

        if let Err(e) = self.stop_players().await {
            warn!("Failed to stop previous player: {}", e);
        }

        let mut command = Command::new(&self.player);
        command
            .arg("-s")
            .arg(&station.name)
            .arg("-t")
            .arg(self.run_dir.path(TAG_FILE))
            .arg(&station.url)
            .stdin(Stdio::null());
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn().map_err(|source| Error::Spawn {
            command: self.player.clone(),
            source,
        })?;

        if let Some(pid) = child.id() {
            self.run_dir
                .write_entry(PID_FILE, &pid.to_string(), true)
                .await?;
        }
        self.run_dir.write_entry(STATION_FILE, &station.name, false).await?;
        self.run_dir.write_entry(URL_FILE, &station.url, false).await?;

        info!("Playing station {} '{}' ({:?})", id, station.name, child.id());
        self.child = Some(child);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        info!("Stopping playback");
        self.stop_players().await
    }

    async fn change_volume(&mut self, change: VolumeChange) -> Result<()> {
        let status = Command::new(&self.volume_command)
            .args(change.command_args())
            .status()
            .await
            .map_err(|source| Error::Spawn {
                command: self.volume_command.clone(),
                source,
            })?;

        if status.success() {
            debug!("Volume changed: {:?}", change);
            Ok(())
        } else {
            Err(Error::Volume(format!(
                "'{}' exited with {}",
                self.volume_command, status
            )))
        }
    }
}

#[cfg(unix)]
async fn kill_stale_player(pid: &str) {
    if pid.parse::<u32>().is_err() {
        warn!("Ignoring malformed pid '{}'", pid);
        return;
    }
    match Command::new("kill").args(["-KILL", pid]).status().await {
        Ok(status) if status.success() => info!("Killed stale player {}", pid),
        Ok(_) => debug!("Stale player {} was not running", pid),
        Err(e) => warn!("Failed to run kill for {}: {}", pid, e),
    }
}

#[cfg(not(unix))]
async fn kill_stale_player(pid: &str) {
    warn!("Cannot stop player {} started by another daemon instance", pid);
}
