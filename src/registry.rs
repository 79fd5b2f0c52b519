use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, RwLock},
};

use crate::{error::PollError, station::Station};

pub const MAX_STATIONS: usize = 1000;

pub type StationRef = Arc<Mutex<Station>>;

/// All stations of the process, keyed by their public key.
///
/// Creation holds the write lock across the uniqueness check and the insert.
/// Every mutation of a station goes through that station's own mutex.
pub struct Registry {
    stations: RwLock<HashMap<String, StationRef>>,
    max_stations: usize,
    max_polls: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new(MAX_STATIONS, crate::station::MAX_POLLS)
    }
}

impl Registry {
    pub fn new(max_stations: usize, max_polls: usize) -> Self {
        Registry {
            stations: RwLock::new(HashMap::new()),
            max_stations,
            max_polls,
        }
    }

    pub fn create_station(
        &self,
        key: &str,
        admin_key: &str,
        expected_voters: usize,
    ) -> Result<StationRef, PollError> {
        let mut stations = self.stations.write().map_err(|_| PollError::LockPoisoned)?;
        if stations.len() >= self.max_stations {
            return Err(PollError::CapacityExceeded);
        }
        if stations.contains_key(key) {
            return Err(PollError::DuplicateKey);
        }
        let station = Arc::new(Mutex::new(Station::with_limit(
            key,
            admin_key,
            expected_voters,
            self.max_polls,
        )));
        stations.insert(key.to_string(), station.clone());
        tracing::info!("Station {} created", key);
        Ok(station)
    }

    /// `None` for an absent key; a poisoned map is an error, not an absence.
    pub fn lookup(&self, key: &str) -> Result<Option<StationRef>, PollError> {
        let stations = self.stations.read().map_err(|_| PollError::LockPoisoned)?;
        Ok(stations.get(key).cloned())
    }

    pub fn station(&self, key: &str) -> Result<StationRef, PollError> {
        self.lookup(key)?.ok_or(PollError::NotFound)
    }

    pub fn len(&self) -> Result<usize, PollError> {
        let stations = self.stations.read().map_err(|_| PollError::LockPoisoned)?;
        Ok(stations.len())
    }

    pub fn is_empty(&self) -> Result<bool, PollError> {
        Ok(self.len()? == 0)
    }
}

pub fn lock(station: &Mutex<Station>) -> Result<MutexGuard<'_, Station>, PollError> {
    station.lock().map_err(|_| PollError::LockPoisoned)
}
