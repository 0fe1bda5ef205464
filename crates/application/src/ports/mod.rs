pub mod dns_resolver;
pub mod nameserver_source;
pub mod network_observer;

pub use dns_resolver::DnsResolver;
pub use nameserver_source::NameserverSource;
pub use network_observer::NetworkObserver;
