pub mod key;

pub use key::CacheKey;

use ferrous_osdns_domain::config::DEFAULT_CACHE_SIZE;
use hickory_proto::op::{Message, ResponseCode};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub insertions: AtomicU64,
    pub evictions: AtomicU64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(AtomicOrdering::Relaxed) as f64;
        let misses = self.misses.load(AtomicOrdering::Relaxed) as f64;
        let total = hits + misses;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

struct CacheEntry {
    response: Arc<Message>,
    expires_at: Instant,
}

/// Size-bounded LRU of upstream answers.
///
/// Only `NOERROR` answers carrying at least one answer record with a
/// non-zero TTL are stored. An entry lives until the smallest answer TTL
/// elapses; TTLs in the stored message are not rewritten.
pub struct DnsCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
    capacity: NonZeroUsize,
    metrics: CacheMetrics,
}

impl DnsCache {
    /// `capacity` 0 falls back to the default size.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CACHE_SIZE))
            .unwrap_or(NonZeroUsize::MIN);

        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity,
            metrics: CacheMetrics::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Arc<Message>> {
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
                return Some(Arc::clone(&entry.response));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            debug!(name = %key.name, record_type = key.record_type, "Cache entry expired");
        }
        self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
        None
    }

    /// Stores `response` if it is cacheable. Returns whether it was stored.
    pub async fn insert(&self, key: CacheKey, response: &Message) -> bool {
        let Some(ttl) = cacheable_ttl(response) else {
            return false;
        };

        let entry = CacheEntry {
            response: Arc::new(response.clone()),
            expires_at: Instant::now() + Duration::from_secs(u64::from(ttl)),
        };

        let mut entries = self.entries.lock().await;
        if let Some((evicted, _)) = entries.push(key.clone(), entry) {
            if evicted != key {
                self.metrics.evictions.fetch_add(1, AtomicOrdering::Relaxed);
            }
        }
        self.metrics.insertions.fetch_add(1, AtomicOrdering::Relaxed);
        true
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

/// Minimum answer TTL of a cacheable response.
fn cacheable_ttl(response: &Message) -> Option<u32> {
    if response.response_code() != ResponseCode::NoError || response.truncated() {
        return None;
    }

    response
        .answers()
        .iter()
        .map(|record| record.ttl())
        .min()
        .filter(|ttl| *ttl > 0)
}
