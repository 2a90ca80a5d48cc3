use std::env;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter, e.g. `debug` or `devsweep_core=trace`
pub const LOG_ENV: &str = "DEVSWEEP_LOG";

/// Default log file under the user cache directory
pub fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("devsweep")
        .join("devsweep.log")
}

/// Install the global subscriber. Logs go to a file only; the terminal
/// belongs to the TUI. Keep the guard alive until exit so buffered lines
/// are flushed.
pub fn init_logging(log_file: Option<PathBuf>) -> Result<WorkerGuard> {
    let filter = env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::try_new(&filter)?;

    let path = log_file.unwrap_or_else(default_log_file);
    let (dir, file_name) = split_log_path(&path)?;
    std::fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_ansi(false),
        )
        .with(filter_layer)
        .try_init()?;

    info!(log_file = %path.display(), "logging initialised");

    Ok(guard)
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(file_name)))
}
