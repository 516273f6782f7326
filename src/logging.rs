//! Tracing subscriber setup.
//!
//! One-shot commands log to stderr. The TUI owns the terminal, so while it
//! runs everything goes to `taskflow.log` in the data directory instead.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn filter(debug: bool, quiet_level: &str) -> EnvFilter {
    let level = if debug { "debug" } else { quiet_level };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("taskflow={}", level)))
}

/// Log to stderr
pub fn init_stderr(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(debug, "warn"))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Log to a file, appending
pub fn init_file(path: &Path, debug: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(debug, "info"))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
