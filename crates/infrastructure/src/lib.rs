//! Ferrous OS DNS Infrastructure Layer
//!
//! Transports, the network-change detector, the OS-aware resolver and its
//! decorators, and the system nameserver source.
pub mod dns;
pub mod system;
