//! Station table
//!
//! Stations are numbered from 1 in the order the configuration lists them.
//! Id 0 means "nothing playing".

use mspd_common::TomlConfig;
use tracing::warn;

pub use mspd_common::config::StationEntry as Station;

/// Ordered list of the stations clients can select
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationTable {
    stations: Vec<Station>,
}

impl StationTable {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// Build the table from `daemon.stations` and the `[stations]` definitions
    ///
    /// Keys without a definition are skipped.
    pub fn from_config(config: &TomlConfig) -> Self {
        let stations = config
            .daemon
            .stations
            .iter()
            .filter_map(|key| match config.stations.get(key) {
                Some(station) => Some(station.clone()),
                None => {
                    warn!("Station '{}' is listed but not defined, skipping", key);
                    None
                }
            })
            .collect();
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Station with the given id (1-based)
    pub fn get(&self, id: usize) -> Option<&Station> {
        id.checked_sub(1).and_then(|index| self.stations.get(index))
    }

    /// Id of the station with this name and URL
    pub fn find(&self, name: &str, url: &str) -> Option<usize> {
        self.stations
            .iter()
            .position(|s| s.name == name && s.url == url)
            .map(|index| index + 1)
    }

    /// Stations with their ids
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Station)> {
        self.stations.iter().enumerate().map(|(index, s)| (index + 1, s))
    }

    /// Id `delta` steps away from `current`, wrapping around the list
    ///
    /// From idle (`current == 0`) a forward step lands on the first station
    /// and a backward step on the last. Returns `None` for an empty table.
    pub fn step(&self, current: usize, delta: i64) -> Option<usize> {
        if self.stations.is_empty() {
            return None;
        }
        let len = self.stations.len() as i64;
        let base = match current {
            0 if delta > 0 => -1,
            0 => 0,
            id => id as i64 - 1,
        };
        Some((base + delta).rem_euclid(len) as usize + 1)
    }
}
