//! DNS resolver stack
//!
//! The OS-aware resolver does the actual forwarding. Decorators wrap it
//! through [`ResolverBuilder`]:
//!
//! - **Cache**: answer caching keyed by question (outermost)
//! - **Core**: [`OsResolver`], candidates taken from the network snapshot
//!
//! ```no_run
//! use ferrous_osdns_infrastructure::dns::cache::DnsCache;
//! use ferrous_osdns_infrastructure::dns::resolver::{initialize_os_resolver, ResolverBuilder};
//! use std::sync::Arc;
//!
//! # async fn build() {
//! let resolver = ResolverBuilder::new(initialize_os_resolver().await)
//!     .with_cache(Arc::new(DnsCache::new(4096)))
//!     .build();
//! # }
//! ```

pub mod builder;
pub mod cache_layer;
pub mod global;
pub mod os_resolver;

pub use builder::ResolverBuilder;
pub use cache_layer::CachedResolver;
pub use global::{initialize_os_resolver, os_resolver};
pub use os_resolver::{Candidate, OsResolver, DEFAULT_ATTEMPT_TIMEOUT};
