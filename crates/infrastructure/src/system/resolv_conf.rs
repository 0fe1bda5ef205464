use async_trait::async_trait;
use ferrous_osdns_application::ports::NameserverSource;
use ferrous_osdns_domain::DomainError;
use tokio::fs;
use tracing::debug;

pub const DEFAULT_RESOLV_CONF: &str = "/etc/resolv.conf";

/// Extracts `nameserver` entries in file order.
/// Comment lines (`#` or `;`) and every other directive are ignored.
pub fn parse_resolv_conf(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some("nameserver"), Some(addr)) => Some(addr.to_string()),
                _ => None,
            }
        })
        .collect()
}

/// System nameserver source backed by resolv.conf
pub struct ResolvConfReader {
    path: String,
}

impl ResolvConfReader {
    pub fn new() -> Self {
        Self {
            path: DEFAULT_RESOLV_CONF.to_string(),
        }
    }

    /// Create a reader for a custom file path (useful for testing)
    pub fn with_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Default for ResolvConfReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameserverSource for ResolvConfReader {
    async fn nameservers(&self) -> Result<Vec<String>, DomainError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::IoError(format!("Failed to read {}: {}", self.path, e))
        })?;

        let nameservers = parse_resolv_conf(&content);
        debug!(path = %self.path, count = nameservers.len(), "resolv.conf parsed");
        Ok(nameservers)
    }
}
