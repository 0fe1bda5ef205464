use std::time::Duration;

use async_trait::async_trait;
use ferrous_osdns_domain::DomainError;

use super::{DnsTransport, TransportResponse};

/// DNS-over-QUIC endpoint. Classified and constructed, but no exchange is
/// performed; every attempt fails as unsupported so the resolver moves on.
pub struct QuicTransport {
    hostname: String,
    port: u16,
}

impl QuicTransport {
    pub fn new(hostname: String, port: u16) -> Self {
        Self { hostname, port }
    }
}

#[async_trait]
impl DnsTransport for QuicTransport {
    async fn send(
        &self,
        _message_bytes: &[u8],
        _timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        Err(DomainError::UnsupportedTransport(format!(
            "DoQ upstream {}:{} not yet implemented",
            self.hostname, self.port
        )))
    }

    fn protocol_name(&self) -> &'static str {
        "QUIC"
    }
}
