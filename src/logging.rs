// ABOUTME: Diagnostic logging setup — tracing subscriber writing to a log file.
// ABOUTME: The terminal belongs to the UI, so nothing is logged to stderr while it runs.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Environment variable holding a tracing filter directive, e.g. `chatline=debug`.
pub const LOG_ENV: &str = "CHATLINE_LOG";

/// Build the filter: `CHATLINE_LOG` if set and valid, else the configured level.
pub fn filter(config: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("invalid log level '{}'", config.level))
}

/// Install the global subscriber. Returns the log file path.
pub fn init(config: &LoggingConfig) -> anyhow::Result<PathBuf> {
    let path = config.file_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter(config)?)
        .with(fmt_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(path)
}
