use arc_swap::ArcSwap;
use ferrous_osdns_application::ports::NetworkObserver;
use ferrous_osdns_domain::{LanPolicy, NetworkSnapshot, Observation};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tracks the host's nameservers and publishes an immutable
/// [`NetworkSnapshot`] after every refresh.
///
/// Readers take a consistent snapshot with a single atomic load and never
/// block writers. Concurrent refreshes are serialized through `rcu`, so
/// each transition is computed from the snapshot it replaces.
pub struct NetworkChangeDetector {
    snapshot: ArcSwap<NetworkSnapshot>,
    policy: LanPolicy,
}

impl NetworkChangeDetector {
    pub fn new(policy: LanPolicy) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(NetworkSnapshot::empty()),
            policy,
        }
    }

    /// Classifies `nameservers` (OS order) and publishes the next snapshot.
    /// Returns the snapshot this call published.
    pub fn refresh<S: AsRef<str>>(&self, nameservers: &[S]) -> Arc<NetworkSnapshot> {
        let observation = Observation::partition(nameservers, &self.policy);

        for entry in &observation.skipped {
            warn!(entry = %entry, "Ignoring nameserver that is not an IP address");
        }

        let mut published = None;
        let previous = self.snapshot.rcu(|current| {
            let next = Arc::new(current.advance(&observation));
            published = Some(Arc::clone(&next));
            next
        });

        let next = published.unwrap_or_else(|| self.snapshot.load_full());

        if previous.current_lan_server != next.current_lan_server {
            match next.current_lan_server {
                Some(lan) => info!(lan_server = %lan, "LAN nameserver changed"),
                None => debug!(
                    last_lan_server = ?next.last_lan_server,
                    "LAN nameserver settled"
                ),
            }
        }

        debug!(
            current_lan_server = ?next.current_lan_server,
            last_lan_server = ?next.last_lan_server,
            public_servers = next.public_servers.len(),
            "Network snapshot published"
        );

        next
    }

    pub fn current_snapshot(&self) -> Arc<NetworkSnapshot> {
        self.snapshot.load_full()
    }

    /// Replaces the snapshot outright.
    pub fn publish(&self, snapshot: NetworkSnapshot) {
        self.snapshot.store(Arc::new(snapshot));
    }

    pub fn policy(&self) -> &LanPolicy {
        &self.policy
    }
}

impl Default for NetworkChangeDetector {
    fn default() -> Self {
        Self::new(LanPolicy::default())
    }
}

impl NetworkObserver for NetworkChangeDetector {
    fn refresh(&self, nameservers: &[String]) -> Arc<NetworkSnapshot> {
        NetworkChangeDetector::refresh(self, nameservers)
    }

    fn current_snapshot(&self) -> Arc<NetworkSnapshot> {
        NetworkChangeDetector::current_snapshot(self)
    }
}
