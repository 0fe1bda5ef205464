use crate::NetworkMonitorJob;
use std::sync::Arc;
use tracing::info;

/// Central orchestrator for all background jobs.
///
/// Use the builder pattern to register jobs, then call `.start()` once.
///
/// # Example
///
/// ```rust,ignore
/// JobRunner::new()
///     .with_network_monitor(NetworkMonitorJob::new(refresh).with_interval(30))
///     .start()
///     .await;
/// ```
pub struct JobRunner {
    network_monitor: Option<NetworkMonitorJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            network_monitor: None,
        }
    }

    pub fn with_network_monitor(mut self, job: NetworkMonitorJob) -> Self {
        self.network_monitor = Some(job);
        self
    }

    /// Start all registered background jobs.
    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.network_monitor {
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
