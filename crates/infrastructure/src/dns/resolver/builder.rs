use super::super::cache::DnsCache;
use super::cache_layer::CachedResolver;
use super::os_resolver::OsResolver;
use ferrous_osdns_application::ports::DnsResolver;
use std::sync::Arc;
use tracing::info;

pub struct ResolverBuilder {
    core: Arc<OsResolver>,
    cache: Option<Arc<DnsCache>>,
}

impl ResolverBuilder {
    pub fn new(core: Arc<OsResolver>) -> Self {
        Self { core, cache: None }
    }

    pub fn with_cache(mut self, cache: Arc<DnsCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Arc<dyn DnsResolver> {
        info!(
            cache = self.cache.is_some(),
            cache_size = self.cache.as_ref().map(|c| c.capacity()),
            "Building DNS resolver"
        );

        let mut resolver: Arc<dyn DnsResolver> = self.core;

        if let Some(cache) = self.cache {
            resolver = Arc::new(CachedResolver::new(resolver, cache));
        }

        resolver
    }
}
