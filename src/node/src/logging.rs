//! Logger initialization from configuration

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSection;

/// Initialize the global tracing subscriber.
///
/// Returns the appender guard when logging to a file; the caller must keep
/// it alive for the lifetime of the process so buffered lines are flushed.
pub fn init(cfg: &LoggingSection) -> Result<Option<WorkerGuard>> {
    let level = match cfg.level.as_str() {
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if cfg.output == "file" {
        let path = Path::new(&cfg.file);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).context("Failed to create log directory")?;
        let file_name = path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "tangle-node.log".into());

        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
            dir, file_name,
        ));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        Ok(None)
    }
}
