use ferrous_osdns_domain::Config;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Console verbosity requested on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbosity {
    pub verbose: u8,
    pub silent: bool,
}

impl Verbosity {
    /// Effective level: `--silent` wins, each `-v` raises the floor.
    pub fn level(&self, configured: LevelFilter) -> LevelFilter {
        if self.silent {
            return LevelFilter::OFF;
        }

        match self.verbose {
            0 => configured,
            1 => configured.max(LevelFilter::INFO),
            _ => configured.max(LevelFilter::DEBUG),
        }
    }

    /// `RUST_LOG` refines the level unless logging is silenced.
    fn filter(&self, level: LevelFilter) -> EnvFilter {
        if self.silent {
            return EnvFilter::new("off");
        }

        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    }
}

/// Parses a configured level name. `notice` is accepted and maps to INFO.
fn parse_level(name: &str) -> Option<LevelFilter> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("notice") {
        return Some(LevelFilter::INFO);
    }
    name.parse().ok()
}

/// Installs the global subscriber. Output always goes to the console; when
/// `service.log_path` is set it is also written to that file, whose previous
/// content is kept in `<log_path>.1`.
pub fn init_logging(config: &Config, verbosity: Verbosity) -> anyhow::Result<()> {
    let parsed = parse_level(&config.service.log_level);
    let level = verbosity.level(parsed.unwrap_or(LevelFilter::INFO));

    let (log_file, backup_error) = match config.service.log_path.as_deref() {
        Some(path) => {
            let (file, backup_error) = open_log_file(Path::new(path))?;
            (Some(file), backup_error)
        }
        None => (None, None),
    };

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(true);

    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(verbosity.filter(level))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;

    if parsed.is_none() {
        warn!(
            log_level = %config.service.log_level,
            "could not set log level, using info"
        );
    }
    if let Some(e) = backup_error {
        warn!(error = %e, "could not back up old log file, appending");
    }

    info!(
        level = %level,
        log_path = config.service.log_path.as_deref().unwrap_or("console"),
        "Logging initialized"
    );
    Ok(())
}

/// Opens a fresh log file at `path`, creating missing parent directories.
///
/// An existing file is first renamed to `<path>.1`. If that rename fails
/// for any reason other than the file being absent, the old file is opened
/// for appending instead and the rename error is returned alongside it.
fn open_log_file(path: &Path) -> anyhow::Result<(fs::File, Option<io::Error>)> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut options = OpenOptions::new();
    options.create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let backup_error = match fs::rename(path, backup_path(path)) {
        Ok(()) => None,
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => Some(e),
    };

    if backup_error.is_some() {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    Ok((options.open(path)?, backup_error))
}

fn backup_path(path: &Path) -> PathBuf {
    let mut backup = OsString::from(path.as_os_str());
    backup.push(".1");
    PathBuf::from(backup)
}
