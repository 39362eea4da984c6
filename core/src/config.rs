//! Client configuration.
//!
//! Defaults point at the production webhook with the description timestamp
//! format. `from_env` lets a host or test override each field through
//! `HABITS_*` variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::payload::TimestampFormat;

/// Webhook that receives every logged event.
pub const DEFAULT_ENDPOINT: &str = "https://neuralmediclookbook-25w87d6g.b4a.run/data/";

pub const ENDPOINT_VAR: &str = "HABITS_ENDPOINT";
pub const TIMESTAMP_FORMAT_VAR: &str = "HABITS_TIMESTAMP_FORMAT";
pub const TIMEOUT_VAR: &str = "HABITS_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timestamp_format: TimestampFormat,
    /// Overall request timeout. `None` keeps the HTTP stack's default.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timestamp_format: TimestampFormat::Description,
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from defaults, overriding any variable `lookup` returns.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            config.endpoint = endpoint;
        }
        if let Some(raw) = lookup(TIMESTAMP_FORMAT_VAR) {
            config.timestamp_format = raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: TIMESTAMP_FORMAT_VAR,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: TIMEOUT_VAR,
                value: raw.clone(),
            })?;
            config.timeout_secs = Some(secs);
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
