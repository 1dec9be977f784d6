// src/logging.rs
//! File-backed tracing setup. The terminal UI owns stdout and stderr.

use std::fs::File;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogSettings;

pub const LOG_FILE: &str = "retrojukebox.log";

/// Keeps the background writer alive; drop it to flush.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Install the global subscriber. Returns `Ok(None)` when logging is disabled.
pub fn init(settings: &LogSettings) -> Result<Option<LogGuard>> {
    if !settings.enabled {
        return Ok(None);
    }

    let dir = settings.log_directory();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::builder()
        .with_default_directive(settings.parse_level().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    tracing::info!(path = %path.display(), level = %settings.level, "logging initialized");
    Ok(Some(LogGuard { _guard: guard }))
}
