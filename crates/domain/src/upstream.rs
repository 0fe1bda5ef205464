use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Transport spoken to an upstream, derived from its endpoint string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverType {
    /// Plain DNS over UDP, TCP on truncation.
    Legacy,
    /// DNS-over-TLS (RFC 7858).
    Dot,
    /// DNS-over-HTTPS (RFC 8484).
    Doh,
    /// DNS-over-QUIC (RFC 9250).
    Doq,
}

impl ResolverType {
    /// Classifies an upstream endpoint.
    ///
    /// `https://` and `quic://` select DoH and DoQ purely from the scheme.
    /// Without a scheme, an IP literal (`8.8.8.8`, `2001:db8::1`), an
    /// `ip:port` or a bracketed `[ipv6]:port` is Legacy. Anything else,
    /// typically a bare hostname, is DoT.
    pub fn from_endpoint(endpoint: &str) -> Self {
        let endpoint = endpoint.trim();

        if let Some((scheme, _)) = endpoint.split_once("://") {
            if scheme.eq_ignore_ascii_case("https") {
                return Self::Doh;
            }
            if scheme.eq_ignore_ascii_case("quic") {
                return Self::Doq;
            }
            return Self::Dot;
        }

        if is_ip_endpoint(endpoint) {
            Self::Legacy
        } else {
            Self::Dot
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Dot => "dot",
            Self::Doh => "doh",
            Self::Doq => "doq",
        }
    }

    /// Port used when the endpoint does not carry one.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Legacy => 53,
            Self::Dot | Self::Doq => 853,
            Self::Doh => 443,
        }
    }
}

impl fmt::Display for ResolverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_ip_endpoint(endpoint: &str) -> bool {
    if endpoint.parse::<IpAddr>().is_ok() || endpoint.parse::<SocketAddr>().is_ok() {
        return true;
    }

    if let Some(inner) = endpoint
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return inner.parse::<IpAddr>().is_ok();
    }

    // Covers ports that do not fit u16 and hosts with zone ids.
    match endpoint.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') || host.starts_with('[') => {
            let host = host.trim_start_matches('[').trim_end_matches(']');
            let host = host.split_once('%').map_or(host, |(ip, _)| ip);
            !port.is_empty() && host.parse::<IpAddr>().is_ok()
        }
        _ => false,
    }
}

/// Splits `host[:port]` / `[v6]:port` into its parts.
///
/// Returns `None` for the port when the endpoint carries none.
pub fn split_host_port(endpoint: &str) -> (&str, Option<u16>) {
    if let Some(rest) = endpoint.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            let port = tail.strip_prefix(':').and_then(|p| p.parse().ok());
            return (host, port);
        }
    }

    match endpoint.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => match port.parse() {
            Ok(port) => (host, Some(port)),
            Err(_) => (endpoint, None),
        },
        _ => (endpoint, None),
    }
}
