use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_osdns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// DNS over TCP with the two-byte length prefix (RFC 1035 §4.2.2).
///
/// Used as the retry path when a UDP answer comes back truncated.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<TransportResponse, DomainError> {
        let server = self.server_addr.to_string();
        let mut stream = TcpStream::connect(self.server_addr)
            .await
            .map_err(|e| DomainError::from_io(server.as_str(), &e))?;
        stream.set_nodelay(true).ok();

        let bytes = exchange_framed(&mut stream, message_bytes, &server).await?;
        debug!(server = %self.server_addr, bytes_received = bytes.len(), "TCP response received");

        Ok(TransportResponse {
            bytes,
            protocol_used: "TCP",
        })
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

/// Writes one length-prefixed message and reads one length-prefixed reply.
/// Shared by the TCP and TLS transports.
pub(crate) async fn exchange_framed<S>(
    stream: &mut S,
    message_bytes: &[u8],
    server: &str,
) -> Result<Vec<u8>, DomainError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let len = u16::try_from(message_bytes.len())
        .map_err(|_| DomainError::InvalidQuery("message exceeds 65535 bytes".into()))?;

    let mut frame = Vec::with_capacity(2 + message_bytes.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(message_bytes);

    stream
        .write_all(&frame)
        .await
        .map_err(|e| DomainError::from_io(server, &e))?;
    stream
        .flush()
        .await
        .map_err(|e| DomainError::from_io(server, &e))?;

    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| read_error(server, &e))?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    if response_len == 0 {
        return Err(DomainError::InvalidDnsResponse(format!(
            "empty TCP frame from {}",
            server
        )));
    }

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(|e| read_error(server, &e))?;

    Ok(response)
}

fn read_error(server: &str, error: &std::io::Error) -> DomainError {
    if error.kind() == std::io::ErrorKind::UnexpectedEof {
        DomainError::TransportConnectionReset {
            server: server.to_string(),
        }
    } else {
        DomainError::from_io(server, error)
    }
}
