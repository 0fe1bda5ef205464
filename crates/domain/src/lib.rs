//! Ferrous OS DNS Domain Layer
pub mod config;
pub mod errors;
pub mod network;
pub mod upstream;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use network::{LanPolicy, NetworkSnapshot, Observation};
pub use upstream::ResolverType;
