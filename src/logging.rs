//! Logging setup for ClauDent
//!
//! The terminal belongs to the UI, so everything goes to `claudent.log` in
//! the log directory. The file is truncated at startup so each session starts
//! fresh.

use crate::error::{ClaudentError, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "claudent.log";

pub fn log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Build the filter: `RUST_LOG` wins over the configured directive.
pub fn build_filter(default_directive: &str) -> Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.trim().is_empty() => EnvFilter::try_new(from_env),
        _ => EnvFilter::try_new(default_directive),
    }
    .map_err(|e| ClaudentError::Logging(e.to_string()))
}

/// Initialise the global subscriber.
///
/// Keep the returned guard alive for the whole process; dropping it flushes
/// and stops the background writer.
pub fn init(log_dir: &Path, default_directive: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path(log_dir))?;

    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = build_filter(default_directive)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| ClaudentError::Logging(e.to_string()))?;

    tracing::info!(version = crate::VERSION, "ClauDent starting up");
    Ok(guard)
}
