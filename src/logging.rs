use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_ENV: &str = "ZKB_LOG";
const DEFAULT_FILTER: &str = "zkb=info";

pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Installs the global subscriber: a daily rolling file in `log_dir` (or
/// the default log directory), plus stderr when `verbose`.
///
/// Filter precedence: `filter`, then `ZKB_LOG`, then `zkb=info`.
pub fn init(log_dir: Option<&Path>, filter: Option<&str>, verbose: bool) -> Option<LoggingGuard> {
    let log_dir = match log_dir {
        Some(dir) => std::fs::create_dir_all(dir).ok().map(|()| dir.to_path_buf()),
        None => zkb::paths::ensure_log_dir().ok(),
    }?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "zkb.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = || match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter());

    let stderr_layer = verbose.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(env_filter())
    });

    if tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
