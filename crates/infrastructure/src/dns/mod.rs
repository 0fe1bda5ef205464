pub mod cache;
pub mod forwarding;
pub mod network;
pub mod resolver;
pub mod server;
pub mod transport;

pub use cache::{CacheKey, CacheMetrics, DnsCache};
pub use network::NetworkChangeDetector;
pub use resolver::{initialize_os_resolver, os_resolver, OsResolver, ResolverBuilder};
pub use server::DnsServerHandler;
