//! # Ferrous OS DNS
//!
//! DNS forwarder that follows the host's own nameserver configuration

mod bootstrap;
mod server;

use bootstrap::Verbosity;
use clap::Parser;
use ferrous_osdns_application::use_cases::RefreshNetworkUseCase;
use ferrous_osdns_domain::CliOverrides;
use ferrous_osdns_infrastructure::dns::cache::DnsCache;
use ferrous_osdns_infrastructure::dns::network::NetworkChangeDetector;
use ferrous_osdns_infrastructure::dns::resolver::{OsResolver, ResolverBuilder};
use ferrous_osdns_infrastructure::dns::server::DnsServerHandler;
use ferrous_osdns_infrastructure::system::ResolvConfReader;
use ferrous_osdns_jobs::{JobRunner, NetworkMonitorJob};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "ferrous-osdns")]
#[command(version)]
#[command(about = "OS-aware DNS forwarder")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address, e.g. 127.0.0.1:53
    #[arg(short, long)]
    listen: Option<String>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable logging
    #[arg(short, long)]
    silent: bool,

    /// Response cache size; 0 selects the default
    #[arg(long)]
    cache_size: Option<usize>,

    /// Also write logs to this file; the previous one is kept as <FILE>.1
    #[arg(long)]
    log: Option<String>,

    /// Log level: trace, debug, info, notice, warn or error
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        listen_address: cli.listen,
        cache_size: cli.cache_size,
        log_path: cli.log,
        log_level: cli.log_level,
    };
    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;

    bootstrap::init_logging(
        &config,
        Verbosity {
            verbose: cli.verbose,
            silent: cli.silent,
        },
    )?;

    info!(
        config_file = cli.config.as_deref().unwrap_or("default"),
        listen = %config.listener.address,
        cache_enable = config.service.cache_enable,
        cache_size = config.service.cache_size,
        resolv_conf = %config.network.resolv_conf,
        attempt_timeout_ms = config.network.attempt_timeout_ms,
        request_timeout_ms = config.network.request_timeout_ms,
        "Configuration loaded"
    );

    let attempt_timeout = Duration::from_millis(config.network.attempt_timeout_ms);
    let request_timeout = Duration::from_millis(config.network.request_timeout_ms);
    let detector = Arc::new(NetworkChangeDetector::new(config.lan_policy()?));

    let source = Arc::new(ResolvConfReader::with_path(config.network.resolv_conf.clone()));
    let refresh = Arc::new(RefreshNetworkUseCase::new(source, detector.clone()));
    if let Err(e) = refresh.execute().await {
        warn!(error = %e, "Initial nameserver read failed, starting with no upstreams");
    }

    let os_resolver = OsResolver::new(detector)
        .with_fallback_upstreams(config.network.fallback_upstreams.clone())
        .with_attempt_timeout(attempt_timeout);

    let mut builder = ResolverBuilder::new(Arc::new(os_resolver));
    if config.service.cache_enable {
        builder = builder.with_cache(Arc::new(DnsCache::new(config.service.cache_size)));
    }
    let resolver = builder.build();

    let shutdown = CancellationToken::new();

    JobRunner::new()
        .with_network_monitor(
            NetworkMonitorJob::new(refresh)
                .with_interval(config.network.refresh_interval_secs)
                .with_cancellation(shutdown.clone()),
        )
        .start()
        .await;

    let bind_addr: SocketAddr = config.listener.address.parse()?;
    let handler = DnsServerHandler::new(resolver, request_timeout).with_shutdown(shutdown.clone());

    let server = server::start_dns_server(bind_addr, handler, shutdown.clone());
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            shutdown.cancel();
            server.await?;
        }
    }

    Ok(())
}
