pub mod network_monitor;
pub mod runner;

pub use network_monitor::NetworkMonitorJob;
pub use runner::JobRunner;
