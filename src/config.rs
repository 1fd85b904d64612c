//! Server configuration loaded from environment variables.
//!
//! Every variable is optional; unset variables fall back to defaults, set but
//! unparsable ones are an error.

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_INACTIVITY_TIMEOUT_HOURS: u64 = 12;
const DEFAULT_CLEANUP_INTERVAL_MINUTES: u64 = 30;
const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tournaments untouched for this long are evicted.
    pub inactivity_timeout: Duration,
    pub cleanup_interval: Duration,
    /// Capacity for new tournaments that do not specify one.
    pub default_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            inactivity_timeout: Duration::from_secs(DEFAULT_INACTIVITY_TIMEOUT_HOURS * 3600),
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_MINUTES * 60),
            default_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Load from the process environment.
    ///
    /// Reads `HOST`, `PORT`, `INACTIVITY_TIMEOUT_HOURS`, `CLEANUP_INTERVAL_MINUTES`
    /// and `DEFAULT_CAPACITY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load from an explicit variable map (used by `from_env` and tests).
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let host = vars
            .get("HOST")
            .filter(|h| !h.trim().is_empty())
            .cloned()
            .unwrap_or(defaults.host);
        let port = parse_var(&vars, "PORT")?.unwrap_or(defaults.port);
        let inactivity_timeout = parse_duration(&vars, "INACTIVITY_TIMEOUT_HOURS", 3600)?
            .unwrap_or(defaults.inactivity_timeout);
        let cleanup_interval = parse_duration(&vars, "CLEANUP_INTERVAL_MINUTES", 60)?
            .filter(|d| !d.is_zero())
            .unwrap_or(defaults.cleanup_interval);
        let default_capacity = match parse_var::<usize>(&vars, "DEFAULT_CAPACITY")? {
            Some(c) if c < 2 => {
                return Err(ConfigError::InvalidValue {
                    name: "DEFAULT_CAPACITY",
                    value: c.to_string(),
                })
            }
            Some(c) => c,
            None => defaults.default_capacity,
        };

        Ok(Self {
            host,
            port,
            inactivity_timeout,
            cleanup_interval,
            default_capacity,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match vars.get(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name,
                value: raw.clone(),
            }),
    }
}

/// Parse a whole number of `unit_secs`-long units into a duration.
fn parse_duration(
    vars: &HashMap<String, String>,
    name: &'static str,
    unit_secs: u64,
) -> Result<Option<Duration>, ConfigError> {
    let Some(count) = parse_var::<u64>(vars, name)? else {
        return Ok(None);
    };
    count
        .checked_mul(unit_secs)
        .map(|secs| Some(Duration::from_secs(secs)))
        .ok_or_else(|| ConfigError::InvalidValue {
            name,
            value: count.to_string(),
        })
}
