//! Service configuration read from the environment.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use log::LevelFilter;

pub const BIND_VAR: &str = "TUCREDITO_BIND";
pub const LOG_VAR: &str = "TUCREDITO_LOG";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TUCREDITO_BIND is not a socket address: {value}")]
    InvalidBind {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("TUCREDITO_LOG is not a log level: {0}")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind: SocketAddr,
    pub log_level: LevelFilter,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; unset or blank variables use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_value = var(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let bind = SocketAddr::from_str(bind_value.trim()).map_err(|source| {
            ConfigError::InvalidBind {
                value: bind_value.clone(),
                source,
            }
        })?;

        let log_level = match var(LOG_VAR) {
            Some(value) => LevelFilter::from_str(value.trim())
                .map_err(|_| ConfigError::InvalidLogLevel(value))?,
            None => LevelFilter::Info,
        };

        Ok(Self { bind, log_level })
    }
}
