//! Layered settings: defaults, then a RON file, then the environment, then
//! command-line flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracker_core::{DEFAULT_NOTIFICATION_DURATION, MAX_NOTIFICATION_DURATION};
use tracker_engine::{GatewaySettings, DEFAULT_BASE_URL};
use tracker_logging::tracker_info;

pub const DEFAULT_CONFIG_FILE: &str = "./tracker.ron";
pub const API_URL_ENV: &str = "JOB_TRACKER_API_URL";
const MAX_TIMEOUT_SECS: u64 = 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub api_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub notification_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let gateway = GatewaySettings::default();
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: gateway.connect_timeout.as_secs(),
            request_timeout_secs: gateway.request_timeout.as_secs(),
            notification_secs: DEFAULT_NOTIFICATION_DURATION.as_secs(),
        }
    }
}

impl TrackerConfig {
    /// Reads the config file. Without an explicit path a missing
    /// `./tracker.ron` just means defaults; an explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config: Self = ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.clone(),
            message: err.to_string(),
        })?;
        tracker_info!("Loaded settings from {:?}", path);
        Ok(config)
    }

    /// Applies the environment value, then the command-line value. Blank
    /// values are ignored.
    pub fn with_overrides(mut self, env_api_url: Option<String>, cli_api_url: Option<String>) -> Self {
        for candidate in [env_api_url, cli_api_url].into_iter().flatten() {
            let trimmed = candidate.trim();
            if !trimmed.is_empty() {
                self.api_url = trimmed.to_string();
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_url",
                reason: "must not be empty",
            });
        }
        check_secs(
            "connect_timeout_secs",
            self.connect_timeout_secs,
            MAX_TIMEOUT_SECS,
        )?;
        check_secs(
            "request_timeout_secs",
            self.request_timeout_secs,
            MAX_TIMEOUT_SECS,
        )?;
        check_secs(
            "notification_secs",
            self.notification_secs,
            MAX_NOTIFICATION_DURATION.as_secs(),
        )?;
        Ok(())
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            base_url: self.api_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}

fn check_secs(field: &'static str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be at least one second",
        });
    }
    if value > max {
        return Err(ConfigError::Invalid {
            field,
            reason: "must not exceed one hour",
        });
    }
    Ok(())
}
