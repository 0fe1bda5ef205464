use super::super::network::NetworkChangeDetector;
use super::os_resolver::OsResolver;
use crate::system::ResolvConfReader;
use ferrous_osdns_application::ports::NameserverSource;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

static OS_RESOLVER: OnceLock<Arc<OsResolver>> = OnceLock::new();

/// The process-wide resolver, if [`initialize_os_resolver`] has run.
pub fn os_resolver() -> Option<Arc<OsResolver>> {
    OS_RESOLVER.get().cloned()
}

/// Ensures the process-wide resolver exists and refreshes it from the
/// system resolver configuration.
///
/// Safe to call from any number of tasks at once: exactly one instance is
/// ever created and every caller gets it back.
pub async fn initialize_os_resolver() -> Arc<OsResolver> {
    let resolver = Arc::clone(OS_RESOLVER.get_or_init(|| {
        info!("Creating process-wide OS resolver");
        Arc::new(OsResolver::new(Arc::new(NetworkChangeDetector::default())))
    }));

    match ResolvConfReader::default().nameservers().await {
        Ok(nameservers) => {
            resolver.detector().refresh(&nameservers);
        }
        Err(e) => warn!(error = %e, "Failed to read system nameservers"),
    }

    resolver
}
