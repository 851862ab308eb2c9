use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logger(service_name: &'static str) {
    LOGGER_INIT.get_or_init(|| {
        fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .init();

        tracing::info!(service = service_name, "logger initialized");
    });
}

/// Log to a file instead of stdout. The TUI owns the terminal's alternate
/// screen; log lines written there would corrupt the display.
pub fn init_file_logger(service_name: &'static str, path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    LOGGER_INIT.get_or_init(|| {
        fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .init();

        tracing::info!(service = service_name, "logger initialized");
    });

    Ok(())
}
