pub mod policy;
pub mod snapshot;

pub use policy::LanPolicy;
pub use snapshot::{parse_nameserver, NetworkSnapshot, Observation, DEFAULT_DNS_PORT};
