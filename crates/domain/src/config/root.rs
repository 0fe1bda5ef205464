use super::errors::ConfigError;
use super::listener::ListenerConfig;
use super::network::NetworkConfig;
use super::service::ServiceConfig;
use crate::network::LanPolicy;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main configuration, loaded once at startup
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub listener: ListenerConfig,
}

/// Values given on the command line, applied on top of the file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub listen_address: Option<String>,
    pub cache_size: Option<usize>,
    pub log_path: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Loads the file at `path` (defaults when `None`), applies CLI
    /// overrides and normalizes derived values.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_overrides(cli_overrides);
        config.normalize();
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(address) = overrides.listen_address {
            self.listener.address = address;
        }
        if let Some(size) = overrides.cache_size {
            self.service.cache_enable = true;
            self.service.cache_size = size;
        }
        if let Some(path) = overrides.log_path {
            self.service.log_path = Some(path);
        }
        if let Some(level) = overrides.log_level {
            self.service.log_level = level;
        }
    }

    pub fn normalize(&mut self) {
        self.service.normalize();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listener
            .address
            .parse::<SocketAddr>()
            .map_err(|e| {
                ConfigError::InvalidListenAddress(format!("'{}': {}", self.listener.address, e))
            })?;

        if self.network.attempt_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "network.attempt_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.network.request_timeout_ms <= self.network.attempt_timeout_ms {
            return Err(ConfigError::Validation(format!(
                "network.request_timeout_ms ({}) must be greater than network.attempt_timeout_ms ({})",
                self.network.request_timeout_ms, self.network.attempt_timeout_ms
            )));
        }

        if self.network.refresh_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "network.refresh_interval_secs must be greater than 0".into(),
            ));
        }

        self.lan_policy()?;
        Ok(())
    }

    /// LAN classification policy: configured ranges or the built-in ones.
    pub fn lan_policy(&self) -> Result<LanPolicy, ConfigError> {
        match &self.network.lan_ranges {
            Some(ranges) => LanPolicy::from_cidrs(ranges).map_err(ConfigError::InvalidLanRange),
            None => Ok(LanPolicy::default()),
        }
    }
}
