use std::{env, fmt::Display, net::IpAddr, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};
use tracing::info;

use crate::{registry::MAX_STATIONS, station::MAX_POLLS};

#[derive(Debug, Clone)]
pub struct Config {
    pub address: IpAddr,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_stations: usize,
    pub max_polls: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            address: try_load("POLL_ADDRESS", "127.0.0.1")?,
            port: try_load("POLL_PORT", "7912")?,
            static_dir: try_load("POLL_STATIC_DIR", "static")?,
            max_stations: try_load("POLL_MAX_STATIONS", &MAX_STATIONS.to_string())?,
            max_polls: try_load("POLL_MAX_POLLS", &MAX_POLLS.to_string())?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse(key, &value)
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value {value:?}: {e}"))
}
