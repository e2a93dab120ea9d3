//! Targetwatch Library
//!
//! A terminal monitor that reconciles Polymarket's chainlink price stream
//! with the Vatic target-price snapshot API for a user-selected asset and
//! timeframe.

pub mod cli;
pub mod config;
pub mod market_data;
pub mod polymarket;
pub mod session;
pub mod ui;
pub mod vatic;

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;

/// Application result type for consistent error handling
pub type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize tracing with a file sink.
///
/// The dashboard owns stdout, so log output goes to the configured file.
/// The returned guard must stay alive for the process lifetime; dropping it
/// flushes buffered log lines.
pub fn init_logging(level: &str, log: &config::LogConfig) -> Result<WorkerGuard> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let path = Path::new(&log.file_path);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "targetwatch.log".into());

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("targetwatch={}", level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}
