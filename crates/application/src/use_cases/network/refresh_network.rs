use crate::ports::{NameserverSource, NetworkObserver};
use ferrous_osdns_domain::{DomainError, NetworkSnapshot};
use std::sync::Arc;
use tracing::debug;

/// Use case: read the OS nameserver list and publish a new network snapshot.
/// Run on every network-configuration poll.
pub struct RefreshNetworkUseCase {
    source: Arc<dyn NameserverSource>,
    observer: Arc<dyn NetworkObserver>,
}

impl RefreshNetworkUseCase {
    pub fn new(source: Arc<dyn NameserverSource>, observer: Arc<dyn NetworkObserver>) -> Self {
        Self { source, observer }
    }

    pub async fn execute(&self) -> Result<Arc<NetworkSnapshot>, DomainError> {
        let nameservers = self.source.nameservers().await?;
        debug!(count = nameservers.len(), "OS nameservers read");

        Ok(self.observer.refresh(&nameservers))
    }
}
