//! `LogSink` that re-emits events through `tracing`.

use super::{LogLevel, LogSink};

/// Sends every event to the active `tracing` subscriber.
///
/// `Verbose` maps to `INFO`. The data path, when present, is attached as the
/// `path` field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str, path: Option<&str>) {
        let path = path.unwrap_or("");
        match level {
            LogLevel::Error => tracing::error!(path, "{}", message),
            LogLevel::Warning => tracing::warn!(path, "{}", message),
            LogLevel::Verbose => tracing::info!(path, "{}", message),
            LogLevel::Debug => tracing::debug!(path, "{}", message),
        }
    }
}
