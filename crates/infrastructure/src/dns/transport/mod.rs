pub mod https;
pub mod quic;
pub mod tcp;
pub mod tls;
pub mod udp;

use async_trait::async_trait;
use ferrous_osdns_domain::network::parse_nameserver;
use ferrous_osdns_domain::upstream::split_host_port;
use ferrous_osdns_domain::{DomainError, ResolverType};
use std::net::SocketAddr;
use std::time::Duration;

/// Result of a raw DNS transport operation
#[derive(Debug)]
pub struct TransportResponse {
    /// Raw DNS response bytes (wire format)
    pub bytes: Vec<u8>,
    /// Which protocol was used
    pub protocol_used: &'static str,
}

/// Trait for sending raw DNS messages over the wire
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

/// Enum-dispatched transport, one variant per [`ResolverType`] plus TCP for
/// truncated UDP answers.
///
/// Every `send` owns its socket or stream for the duration of the call, so
/// dropping the future closes it.
pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
    #[cfg(feature = "dns-over-rustls")]
    Tls(tls::TlsTransport),
    #[cfg(feature = "dns-over-https")]
    Https(https::HttpsTransport),
    Quic(quic::QuicTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(t) => DnsTransport::send(t, message_bytes, timeout).await,
            #[cfg(feature = "dns-over-https")]
            Self::Https(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Quic(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    /// Protocol name for logging.
    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
            #[cfg(feature = "dns-over-rustls")]
            Self::Tls(_) => "TLS",
            #[cfg(feature = "dns-over-https")]
            Self::Https(_) => "HTTPS",
            Self::Quic(_) => "QUIC",
        }
    }
}

/// Transport for a bare nameserver address taken from the OS.
pub fn for_address(addr: SocketAddr) -> Transport {
    Transport::Udp(udp::UdpTransport::new(addr))
}

/// Classifies `endpoint` and builds the matching transport.
pub fn create_transport(endpoint: &str) -> Result<Transport, DomainError> {
    let resolver_type = ResolverType::from_endpoint(endpoint);

    match resolver_type {
        ResolverType::Legacy => parse_nameserver(endpoint)
            .map(for_address)
            .ok_or_else(|| DomainError::InvalidEndpoint(endpoint.to_string())),

        #[cfg(feature = "dns-over-rustls")]
        ResolverType::Dot => {
            let (host, port) = host_and_port(endpoint, resolver_type)?;
            Ok(Transport::Tls(tls::TlsTransport::new(host, port)))
        }

        #[cfg(not(feature = "dns-over-rustls"))]
        ResolverType::Dot => Err(DomainError::UnsupportedTransport(format!(
            "TLS feature not enabled. Enable 'dns-over-rustls' feature to use: {}",
            endpoint
        ))),

        #[cfg(feature = "dns-over-https")]
        ResolverType::Doh => Ok(Transport::Https(https::HttpsTransport::new(
            endpoint.to_string(),
        ))),

        #[cfg(not(feature = "dns-over-https"))]
        ResolverType::Doh => Err(DomainError::UnsupportedTransport(format!(
            "HTTPS feature not enabled. Enable 'dns-over-https' feature to use: {}",
            endpoint
        ))),

        ResolverType::Doq => {
            let (host, port) = host_and_port(endpoint, resolver_type)?;
            Ok(Transport::Quic(quic::QuicTransport::new(host, port)))
        }
    }
}

/// Host and port of a DoT/DoQ endpoint, scheme and path stripped.
fn host_and_port(
    endpoint: &str,
    resolver_type: ResolverType,
) -> Result<(String, u16), DomainError> {
    let authority = endpoint
        .split_once("://")
        .map_or(endpoint, |(_, rest)| rest);
    let authority = authority.split('/').next().unwrap_or_default();

    let (host, port) = split_host_port(authority);
    if host.is_empty() {
        return Err(DomainError::InvalidEndpoint(endpoint.to_string()));
    }

    Ok((
        host.to_string(),
        port.unwrap_or_else(|| resolver_type.default_port()),
    ))
}
