use ipnetwork::IpNetwork;
use std::net::IpAddr;

/// RFC1918 + link-local for IPv4, ULA + link-local for IPv6.
pub const DEFAULT_LAN_RANGES: &[&str] = &[
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "169.254.0.0/16",
    "fc00::/7",
    "fe80::/10",
];

/// Decides which nameserver addresses are LAN-local.
///
/// Addresses outside every range, loopback included, are treated as
/// WAN-public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanPolicy {
    ranges: Vec<IpNetwork>,
}

impl LanPolicy {
    pub fn new(ranges: Vec<IpNetwork>) -> Self {
        Self { ranges }
    }

    /// Builds a policy from CIDR strings, failing on the first invalid one.
    pub fn from_cidrs<S: AsRef<str>>(cidrs: &[S]) -> Result<Self, String> {
        let ranges = cidrs
            .iter()
            .map(|cidr| {
                let cidr = cidr.as_ref().trim();
                cidr.parse::<IpNetwork>()
                    .map_err(|e| format!("'{}': {}", cidr, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { ranges })
    }

    pub fn is_lan(&self, ip: IpAddr) -> bool {
        let ip = ip.to_canonical();
        self.ranges.iter().any(|range| range.contains(ip))
    }

    pub fn ranges(&self) -> &[IpNetwork] {
        &self.ranges
    }
}

impl Default for LanPolicy {
    fn default() -> Self {
        Self {
            ranges: DEFAULT_LAN_RANGES
                .iter()
                .filter_map(|cidr| cidr.parse().ok())
                .collect(),
        }
    }
}
