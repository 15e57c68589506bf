//! Logging setup for the `streetfood` binary.
//!
//! Console output goes to stderr so that JSON written to stdout stays clean.
//! Optionally a daily-rolling file log is kept in the platform data directory:
//!
//! - Windows: `%APPDATA%/streetfood/logs`
//! - macOS: `~/Library/Application Support/streetfood/logs`
//! - Linux: `~/.local/share/streetfood/logs`
//!
//! The level defaults to `info` and can be overridden with `RUST_LOG`.

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Returns the log directory, creating it if needed.
///
/// # Errors
///
/// Returns an error if the data directory is unknown or cannot be created.
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = base_dir.join("streetfood").join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Installs the global subscriber. Call once, at startup.
///
/// # Errors
///
/// Returns error if the env filter is invalid or the file appender cannot be
/// created.
pub fn init(with_file: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let (file_layer, log_dir) = if with_file {
        let log_dir = get_log_dir()?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(10)
            .filename_prefix("streetfood")
            .filename_suffix("log")
            .build(&log_dir)
            .context("Failed to create file appender")?;
        let layer = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(appender);
        (Some(layer), Some(log_dir))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = log_dir {
        tracing::debug!("Logging to {}", dir.display());
    }
    Ok(())
}
