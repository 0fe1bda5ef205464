#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_osdns_application::ports::{NameserverSource, NetworkObserver};
use ferrous_osdns_domain::{DomainError, LanPolicy, NetworkSnapshot, Observation};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

// ============================================================================
// Mock NameserverSource
// ============================================================================

#[derive(Clone, Default)]
pub struct MockNameserverSource {
    nameservers: Arc<RwLock<Vec<String>>>,
    should_fail: Arc<RwLock<bool>>,
}

impl MockNameserverSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nameservers(nameservers: &[&str]) -> Self {
        Self {
            nameservers: Arc::new(RwLock::new(
                nameservers.iter().map(|s| s.to_string()).collect(),
            )),
            should_fail: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn set_nameservers(&self, nameservers: &[&str]) {
        *self.nameservers.write().await = nameservers.iter().map(|s| s.to_string()).collect();
    }

    pub async fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().await = fail;
    }
}

#[async_trait]
impl NameserverSource for MockNameserverSource {
    async fn nameservers(&self) -> Result<Vec<String>, DomainError> {
        if *self.should_fail.read().await {
            return Err(DomainError::IoError("mock source failure".into()));
        }
        Ok(self.nameservers.read().await.clone())
    }
}

// ============================================================================
// Recording NetworkObserver
// ============================================================================

/// Applies the real snapshot transition and records every observed list.
#[derive(Default)]
pub struct RecordingObserver {
    snapshot: Mutex<Arc<NetworkSnapshot>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl NetworkObserver for RecordingObserver {
    fn refresh(&self, nameservers: &[String]) -> Arc<NetworkSnapshot> {
        self.calls.lock().unwrap().push(nameservers.to_vec());

        let mut snapshot = self.snapshot.lock().unwrap();
        let observation = Observation::partition(nameservers, &LanPolicy::default());
        *snapshot = Arc::new(snapshot.advance(&observation));
        Arc::clone(&snapshot)
    }

    fn current_snapshot(&self) -> Arc<NetworkSnapshot> {
        Arc::clone(&self.snapshot.lock().unwrap())
    }
}
