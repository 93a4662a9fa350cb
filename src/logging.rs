use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

fn log_dir() -> Option<PathBuf> {
    docspace::kernel::services::adapters::ensure_log_dir()
        .or_else(|_| -> io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("docspace").join("logs");
            std::fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()
}

/// Daily log file in the app log dir, plus a plain stderr copy when
/// `tee_stderr` is set. `RUST_LOG` overrides `default_filter`.
pub fn init(default_filter: &str, tee_stderr: bool) -> Option<LoggingGuard> {
    let log_dir = log_dir()?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "docspace.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);
    let stderr_layer = tee_stderr.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(false)
            .with_target(false)
            .compact()
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer);
    if subscriber.try_init().is_err() {
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
