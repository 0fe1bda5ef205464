use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid listen address: {0}")]
    InvalidListenAddress(String),

    #[error("Invalid LAN range {0}")]
    InvalidLanRange(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}
