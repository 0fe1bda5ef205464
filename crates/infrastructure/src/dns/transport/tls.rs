use super::tcp::exchange_framed;
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_osdns_domain::DomainError;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// Client config shared by every DoT connection, trusting the webpki roots.
static TLS_CONFIG: LazyLock<Result<Arc<ClientConfig>, rustls::Error>> = LazyLock::new(|| {
    let roots = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config =
        ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()?
            .with_root_certificates(roots)
            .with_no_client_auth();

    Ok(Arc::new(config))
});

/// DNS-over-TLS transport (RFC 7858).
///
/// The hostname is resolved on every attempt and used as the SNI name.
pub struct TlsTransport {
    hostname: String,
    port: u16,
}

impl TlsTransport {
    pub fn new(hostname: String, port: u16) -> Self {
        Self { hostname, port }
    }

    fn server_label(&self) -> String {
        format!("tls://{}:{}", self.hostname, self.port)
    }

    async fn resolve_addr(&self) -> Result<SocketAddr, DomainError> {
        let label = self.server_label();
        tokio::net::lookup_host((self.hostname.as_str(), self.port))
            .await
            .map_err(|e| DomainError::from_io(label.as_str(), &e))?
            .next()
            .ok_or_else(|| DomainError::InvalidEndpoint(label))
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<TransportResponse, DomainError> {
        let label = self.server_label();

        let config = TLS_CONFIG
            .as_ref()
            .map_err(|e| DomainError::UnsupportedTransport(format!("TLS setup failed: {}", e)))?;
        let server_name = ServerName::try_from(self.hostname.clone())
            .map_err(|_| DomainError::InvalidEndpoint(label.clone()))?;

        let addr = self.resolve_addr().await?;
        let tcp = TcpStream::connect(addr)
            .await
            .map_err(|e| DomainError::from_io(label.as_str(), &e))?;
        tcp.set_nodelay(true).ok();

        let mut stream = TlsConnector::from(Arc::clone(config))
            .connect(server_name, tcp)
            .await
            .map_err(|e| DomainError::from_io(label.as_str(), &e))?;

        debug!(server = %label, %addr, "TLS session established");

        let bytes = exchange_framed(&mut stream, message_bytes, &label).await?;

        Ok(TransportResponse {
            bytes,
            protocol_used: "TLS",
        })
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_label(),
            })?
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}
