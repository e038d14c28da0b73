use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

fn filter() -> EnvFilter {
    EnvFilter::try_from_env("CAPPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("capplan=info"))
}

/// Log to stderr. Level comes from `CAPPLAN_LOG` (default `capplan=info`).
pub(crate) fn init_stderr() {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter())
            .init();
    });
}

/// Log to a file so the terminal UI owns the screen.
pub(crate) fn init_file(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    let file = std::sync::Mutex::new(file);
    INIT.call_once(move || {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(file))
            .with(filter())
            .init();
    });
    Ok(())
}
