use async_trait::async_trait;
use ferrous_osdns_domain::DomainError;

/// Supplies the nameserver list currently configured on the host, in OS
/// order.
#[async_trait]
pub trait NameserverSource: Send + Sync {
    async fn nameservers(&self) -> Result<Vec<String>, DomainError>;
}
