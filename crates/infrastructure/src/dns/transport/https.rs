use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_osdns_domain::DomainError;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// Shared HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// Expected content type for DNS-over-HTTPS messages (RFC 8484 §4.2.1)
const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// DNS-over-HTTPS transport (RFC 8484)
pub struct HttpsTransport {
    url: String,
}

impl HttpsTransport {
    pub fn new(url: String) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_error(&self, error: reqwest::Error) -> DomainError {
        if error.is_timeout() {
            DomainError::TransportTimeout {
                server: self.url.clone(),
            }
        } else if error.is_connect() {
            DomainError::TransportConnectionRefused {
                server: self.url.clone(),
            }
        } else {
            DomainError::IoError(format!("DoH request to {} failed: {}", self.url, error))
        }
    }
}

#[async_trait]
impl DnsTransport for HttpsTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        debug!(
            url = %self.url,
            message_len = message_bytes.len(),
            "Sending DoH query"
        );

        let exchange = async {
            // POST with application/dns-message (RFC 8484 §4.1)
            let response = SHARED_CLIENT
                .post(&self.url)
                .header("Content-Type", DNS_MESSAGE_CONTENT_TYPE)
                .header("Accept", DNS_MESSAGE_CONTENT_TYPE)
                .body(message_bytes.to_vec())
                .send()
                .await
                .map_err(|e| self.request_error(e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(DomainError::InvalidDnsResponse(format!(
                    "DoH server {} returned HTTP {}: {}",
                    self.url,
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )));
            }

            response.bytes().await.map_err(|e| self.request_error(e))
        };

        let response_bytes = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.url.clone(),
            })??;

        debug!(
            url = %self.url,
            response_len = response_bytes.len(),
            "DoH response received"
        );

        Ok(TransportResponse {
            bytes: response_bytes.to_vec(),
            protocol_used: "HTTPS",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "HTTPS"
    }
}
