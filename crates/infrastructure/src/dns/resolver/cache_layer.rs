use super::super::cache::{CacheKey, DnsCache};
use super::super::forwarding::MessageBuilder;
use async_trait::async_trait;
use ferrous_osdns_application::ports::DnsResolver;
use ferrous_osdns_application::RequestContext;
use ferrous_osdns_domain::DomainError;
use hickory_proto::op::Message;
use std::sync::Arc;
use tracing::debug;

/// Cache decorator for DNS resolver
///
/// Wraps another resolver and adds caching functionality
pub struct CachedResolver {
    inner: Arc<dyn DnsResolver>,
    cache: Arc<DnsCache>,
}

impl CachedResolver {
    /// Wrap a resolver with caching
    pub fn new(inner: Arc<dyn DnsResolver>, cache: Arc<DnsCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<DnsCache> {
        &self.cache
    }
}

#[async_trait]
impl DnsResolver for CachedResolver {
    async fn resolve(&self, ctx: &RequestContext, query: &Message) -> Result<Message, DomainError> {
        let Some(key) = CacheKey::from_query(query) else {
            return self.inner.resolve(ctx, query).await;
        };

        if let Some(cached) = self.cache.get(&key).await {
            debug!(name = %key.name, record_type = key.record_type, "Cache HIT");
            let mut response = Message::clone(&cached);
            MessageBuilder::set_id(&mut response, query.id());
            return Ok(response);
        }

        let response = self.inner.resolve(ctx, query).await?;

        if self.cache.insert(key.clone(), &response).await {
            debug!(name = %key.name, record_type = key.record_type, "Answer cached");
        }

        Ok(response)
    }
}
