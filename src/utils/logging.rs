use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::utils::app_paths::AppPaths;

/// Initialize tracing with a file writer.
///
/// The terminal belongs to the TUI, so log lines go to a file under the
/// platform data dir. Returns the log path so the caller can tell the user
/// where to tail.
pub fn init_tracing() -> Result<PathBuf> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_path = AppPaths::log_file()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .compact();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::info!(target: "startup", "logging initialized");
    Ok(log_path)
}
