use super::policy::LanPolicy;
use crate::upstream::split_host_port;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_DNS_PORT: u16 = 53;

/// Point-in-time view of the host's nameservers.
///
/// Published as an immutable value; a refresh builds a new snapshot from
/// the previous one instead of mutating it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSnapshot {
    /// LAN nameserver that just changed. `None` once it has been seen twice
    /// in a row.
    pub current_lan_server: Option<SocketAddr>,

    /// Most recently confirmed LAN nameserver. Diagnostic only.
    pub last_lan_server: Option<SocketAddr>,

    /// WAN nameservers in OS order, each with an explicit port.
    pub public_servers: Vec<SocketAddr>,
}

impl NetworkSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Seeds a snapshot with public servers only.
    pub fn with_public_servers(public_servers: Vec<SocketAddr>) -> Self {
        Self {
            public_servers,
            ..Self::default()
        }
    }

    /// Computes the snapshot that follows `self` after `observation`.
    ///
    /// - no LAN server observed: both LAN fields are cleared
    /// - same LAN server as `current_lan_server`: it moves to
    ///   `last_lan_server` and `current_lan_server` is cleared
    /// - any other LAN server: it becomes `current_lan_server`,
    ///   `last_lan_server` is kept
    ///
    /// Public servers are always replaced.
    pub fn advance(&self, observation: &Observation) -> Self {
        let (current_lan_server, last_lan_server) = match observation.lan_server {
            None => (None, None),
            Some(lan) if self.current_lan_server == Some(lan) => (None, Some(lan)),
            Some(lan) => (Some(lan), self.last_lan_server),
        };

        Self {
            current_lan_server,
            last_lan_server,
            public_servers: observation.public_servers.clone(),
        }
    }

    /// Candidate servers in query order: the freshly changed LAN server,
    /// then the public servers.
    pub fn candidates(&self) -> impl Iterator<Item = SocketAddr> + '_ {
        self.current_lan_server
            .into_iter()
            .chain(self.public_servers.iter().copied())
    }

    pub fn candidate_count(&self) -> usize {
        usize::from(self.current_lan_server.is_some()) + self.public_servers.len()
    }
}

/// One OS-reported nameserver list, split by [`LanPolicy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    /// First LAN-local address in OS order.
    pub lan_server: Option<SocketAddr>,
    /// Every WAN address, de-duplicated, OS order kept.
    pub public_servers: Vec<SocketAddr>,
    /// Entries that are not IP addresses.
    pub skipped: Vec<String>,
}

impl Observation {
    pub fn partition<S: AsRef<str>>(observed: &[S], policy: &LanPolicy) -> Self {
        let mut observation = Self::default();

        for entry in observed {
            let entry = entry.as_ref();
            let Some(addr) = parse_nameserver(entry) else {
                observation.skipped.push(entry.to_string());
                continue;
            };

            if policy.is_lan(addr.ip()) {
                if observation.lan_server.is_none() {
                    observation.lan_server = Some(addr);
                }
            } else if !observation.public_servers.contains(&addr) {
                observation.public_servers.push(addr);
            }
        }

        observation
    }
}

/// Parses `ip`, `ip:port`, `[v6]:port` or `v6%zone` into a socket address,
/// defaulting the port to 53. The zone id is dropped.
pub fn parse_nameserver(entry: &str) -> Option<SocketAddr> {
    let entry = entry.trim();
    if let Ok(addr) = entry.parse::<SocketAddr>() {
        return Some(addr);
    }

    let (host, port) = split_host_port(entry);
    let host = host.split_once('%').map_or(host, |(ip, _)| ip);
    let ip = host.parse::<IpAddr>().ok()?;
    Some(SocketAddr::new(ip, port.unwrap_or(DEFAULT_DNS_PORT)))
}
