use ferrous_osdns_application::use_cases::RefreshNetworkUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub struct NetworkMonitorJob {
    refresh: Arc<RefreshNetworkUseCase>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl NetworkMonitorJob {
    pub fn new(refresh: Arc<RefreshNetworkUseCase>) -> Self {
        Self {
            refresh,
            interval_secs: 30,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, secs: u64) -> Self {
        self.interval_secs = secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Spawns the polling loop. The first refresh runs immediately.
    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting network monitor job");

        let job = Arc::clone(&self);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(job.interval_secs));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("NetworkMonitorJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match job.refresh.execute().await {
                            Ok(snapshot) => debug!(
                                candidates = snapshot.candidate_count(),
                                "Network snapshot refreshed"
                            ),
                            Err(e) => error!(error = %e, "Network refresh failed"),
                        }
                    }
                }
            }
        });
    }
}
