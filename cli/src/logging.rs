//! Logging initialization: human-readable logs on stderr, plus a daily-rolling file
//! under `HOTELIER_LOG_DIR` when that variable is set. Stdout stays reserved for replies.
//!
//! - **RUST_LOG**: filter directives. Default: `warn`.
//! - **-v/--verbose**: adds `hotelier=debug` (node and tool call traces).

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const LOG_DIR_ENV: &str = "HOTELIER_LOG_DIR";
const LOG_FILE_PREFIX: &str = "hotelier.log";

fn filter_directives(rust_log: Option<&str>, verbose: bool) -> String {
    let base = rust_log
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("warn");
    if verbose {
        format!("{base},hotelier=debug,hotelier_cli=debug")
    } else {
        base.to_string()
    }
}

fn build_filter(verbose: bool) -> Result<EnvFilter, Box<dyn std::error::Error>> {
    let rust_log = std::env::var("RUST_LOG").ok();
    Ok(EnvFilter::try_new(filter_directives(rust_log.as_deref(), verbose))?)
}

/// Installs the global subscriber. Keep the returned guard alive until exit so the
/// file writer flushes.
pub fn init(verbose: bool) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(build_filter(verbose)?);

    let (file_layer, guard) = match std::env::var(LOG_DIR_ENV).ok().filter(|d| !d.trim().is_empty()) {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(build_filter(verbose)?);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}
