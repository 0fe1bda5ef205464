#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_osdns_application::ports::{NameserverSource, NetworkObserver};
use ferrous_osdns_domain::{DomainError, LanPolicy, NetworkSnapshot, Observation};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct CountingNameserverSource {
    nameservers: Mutex<Vec<String>>,
    reads: AtomicUsize,
    should_fail: AtomicBool,
}

impl CountingNameserverSource {
    pub fn with_nameservers(nameservers: &[&str]) -> Self {
        Self {
            nameservers: Mutex::new(nameservers.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl NameserverSource for CountingNameserverSource {
    async fn nameservers(&self) -> Result<Vec<String>, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::IoError("mock source failure".into()));
        }
        Ok(self.nameservers.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct SnapshotObserver {
    snapshot: Mutex<Arc<NetworkSnapshot>>,
    refreshes: AtomicUsize,
}

impl SnapshotObserver {
    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl NetworkObserver for SnapshotObserver {
    fn refresh(&self, nameservers: &[String]) -> Arc<NetworkSnapshot> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        let mut snapshot = self.snapshot.lock().unwrap();
        let observation = Observation::partition(nameservers, &LanPolicy::default());
        *snapshot = Arc::new(snapshot.advance(&observation));
        Arc::clone(&snapshot)
    }

    fn current_snapshot(&self) -> Arc<NetworkSnapshot> {
        Arc::clone(&self.snapshot.lock().unwrap())
    }
}
