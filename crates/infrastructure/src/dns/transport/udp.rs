use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_osdns_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Plain DNS over UDP.
///
/// A fresh connected socket is bound per query and closed when `send`
/// returns or its future is dropped. Connecting lets ICMP port-unreachable
/// surface as `ConnectionRefused` instead of a timeout.
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<TransportResponse, DomainError> {
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let server = self.server_addr.to_string();
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::from_io(server.as_str(), &e))?;
        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| DomainError::from_io(server.as_str(), &e))?;

        let bytes_sent = socket
            .send(message_bytes)
            .await
            .map_err(|e| DomainError::from_io(server.as_str(), &e))?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let bytes_received = socket
                .recv(&mut recv_buf)
                .await
                .map_err(|e| DomainError::from_io(server.as_str(), &e))?;

            // Stray datagrams (late answers to an earlier query on a reused
            // port) carry a different ID.
            if bytes_received < 2 || recv_buf[..2] != message_bytes[..2] {
                warn!(
                    server = %self.server_addr,
                    bytes_received,
                    "Discarding UDP response with mismatched ID"
                );
                continue;
            }

            recv_buf.truncate(bytes_received);
            debug!(server = %self.server_addr, bytes_received, "UDP response received");

            return Ok(TransportResponse {
                bytes: recv_buf,
                protocol_used: "UDP",
            });
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        if message_bytes.len() < 2 {
            return Err(DomainError::InvalidQuery("message shorter than header".into()));
        }

        tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
