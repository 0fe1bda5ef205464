use serde::{Deserialize, Serialize};

/// DNS frontend settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenerConfig {
    /// Address the UDP frontend binds to (default: "127.0.0.1:53")
    #[serde(default = "default_listen_address")]
    pub address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            address: default_listen_address(),
        }
    }
}

fn default_listen_address() -> String {
    "127.0.0.1:53".to_string()
}
