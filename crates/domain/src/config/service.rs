use serde::{Deserialize, Serialize};

/// Cache capacity used when `cache_size` is left at 0.
pub const DEFAULT_CACHE_SIZE: usize = 4096;

/// Service-wide settings: response cache and logging
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub cache_enable: bool,

    /// Maximum cached answers. 0 means [`DEFAULT_CACHE_SIZE`].
    #[serde(default)]
    pub cache_size: usize,

    /// Log file. Console only when unset.
    #[serde(default)]
    pub log_path: Option<String>,

    /// Log level (default: "info")
    /// Options: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ServiceConfig {
    pub fn normalize(&mut self) {
        if self.cache_size == 0 {
            self.cache_size = DEFAULT_CACHE_SIZE;
        }
        if self.log_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.log_path = None;
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_enable: false,
            cache_size: 0,
            log_path: None,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
