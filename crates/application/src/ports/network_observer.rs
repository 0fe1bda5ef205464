use ferrous_osdns_domain::NetworkSnapshot;
use std::sync::Arc;

/// Receives fresh OS nameserver observations and publishes the resulting
/// snapshot.
pub trait NetworkObserver: Send + Sync {
    fn refresh(&self, nameservers: &[String]) -> Arc<NetworkSnapshot>;

    fn current_snapshot(&self) -> Arc<NetworkSnapshot>;
}
