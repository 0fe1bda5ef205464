use serde::{Deserialize, Serialize};

/// Nameserver discovery and upstream settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Seconds between two reads of the OS nameserver list
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// File the OS nameservers are read from
    #[serde(default = "default_resolv_conf")]
    pub resolv_conf: String,

    /// Per-upstream attempt timeout in milliseconds
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_ms: u64,

    /// Deadline for a whole client request in milliseconds. Must exceed
    /// `attempt_timeout_ms` so a silent upstream still leaves time for
    /// the next one.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// CIDR ranges treated as LAN-local. Built-in defaults when unset.
    #[serde(default)]
    pub lan_ranges: Option<Vec<String>>,

    /// Extra upstream endpoints tried after the OS nameservers
    /// (e.g. "https://dns.example/dns-query", "dns.example", "9.9.9.9:53")
    #[serde(default)]
    pub fallback_upstreams: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            resolv_conf: default_resolv_conf(),
            attempt_timeout_ms: default_attempt_timeout(),
            request_timeout_ms: default_request_timeout(),
            lan_ranges: None,
            fallback_upstreams: Vec::new(),
        }
    }
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_resolv_conf() -> String {
    "/etc/resolv.conf".to_string()
}

fn default_attempt_timeout() -> u64 {
    2000
}

fn default_request_timeout() -> u64 {
    5000
}
