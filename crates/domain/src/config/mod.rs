//! Configuration module for Ferrous OS DNS
//!
//! - `root`: Main configuration and CLI overrides
//! - `service`: Cache and logging settings
//! - `network`: Nameserver refresh, LAN policy and upstream settings
//! - `listener`: Frontend bind address
//! - `errors`: Configuration errors

pub mod errors;
pub mod listener;
pub mod network;
pub mod root;
pub mod service;

pub use errors::ConfigError;
pub use listener::ListenerConfig;
pub use network::NetworkConfig;
pub use root::{CliOverrides, Config};
pub use service::{ServiceConfig, DEFAULT_CACHE_SIZE};
