use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No upstream available")]
    NoUpstreamAvailable,

    #[error("Query canceled")]
    Canceled,

    #[error("Timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("Connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Invalid DNS query: {0}")]
    InvalidQuery(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Invalid upstream endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Unsupported transport: {0}")]
    UnsupportedTransport(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// Failures local to one upstream attempt. The resolver moves on to the
    /// next candidate for these.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. }
                | DomainError::TransportConnectionRefused { .. }
                | DomainError::TransportConnectionReset { .. }
                | DomainError::InvalidDnsResponse(_)
                | DomainError::InvalidEndpoint(_)
                | DomainError::UnsupportedTransport(_)
                | DomainError::IoError(_)
        )
    }

    /// Maps a socket error onto the transport taxonomy.
    pub fn from_io(server: impl Into<String>, error: &std::io::Error) -> Self {
        use std::io::ErrorKind;

        let server = server.into();
        match error.kind() {
            ErrorKind::TimedOut | ErrorKind::WouldBlock => DomainError::TransportTimeout { server },
            ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused { server },
            ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe => {
                DomainError::TransportConnectionReset { server }
            }
            _ => DomainError::IoError(format!("{}: {}", server, error)),
        }
    }
}
