//! Logging setup for the airflow-setup binary.
//!
//! Two layers:
//! - daily rolling file under ~/.airflow_setup/logs (full filter, no ANSI)
//! - stderr console, `warn` only unless verbose, so prompts stay readable
//!
//! Events with target [`FILE_ONLY_TARGET`] never reach the console.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_LOG_FILTER: &str = "airflow_setup=info,airflow_setup_config=info";
/// Target for records that belong in the log file only, e.g. errors the
/// binary already reports on stderr itself.
pub const FILE_ONLY_TARGET: &str = "airflow_setup::file";
const QUIET_CONSOLE_FILTER: &str = "warn";

/// Logging configuration for the binary.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
    /// Override for the log directory; defaults to ~/.airflow_setup/logs
    pub log_dir: Option<PathBuf>,
}

/// Keeps the non-blocking file writer alive. Hold it until exit.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LogGuard {
    /// Directory the file layer writes to, if file logging is active.
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize tracing with a rolling file writer and stderr output.
///
/// A log directory that cannot be created is not fatal: a warning goes to
/// stderr and only the console layer is installed.
pub fn init_logging(config: LogConfig<'_>) -> LogGuard {
    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let console_filter = if config.verbose {
        file_filter.clone()
    } else {
        EnvFilter::new(QUIET_CONSOLE_FILTER)
    };

    let log_dir = config
        .log_dir
        .unwrap_or_else(airflow_setup_config::paths::default_logs_dir);

    let mut file_guard = None;
    let mut active_dir = None;
    let file_layer = match ensure_logs_dir(&log_dir) {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(&dir, log_file_name(config.app_name));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            file_guard = Some(guard);
            active_dir = Some(dir);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(file_filter),
            )
        }
        Err(err) => {
            eprintln!("Warning: failed to create logs directory: {:#}", err);
            None
        }
    };

    // try_init: a second call (tests) must not panic
    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer(console_filter, std::io::stderr))
        .try_init();

    LogGuard {
        _file_guard: file_guard,
        log_dir: active_dir,
    }
}

fn console_layer<S, W>(filter: EnvFilter, writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_filter(filter)
        .with_filter(filter_fn(|meta| meta.target() != FILE_ONLY_TARGET))
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

/// Log file prefix for an application name; the appender adds the date.
pub fn log_file_name(app_name: &str) -> String {
    format!("{}.log", sanitize_name(app_name))
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
