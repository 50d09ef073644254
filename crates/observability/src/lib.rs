//! Tracing/logging setup shared by the binaries.

use serde::Deserialize;

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Initialize process-wide logging with the defaults (`info`, JSON).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_LEVEL, LogFormat::Json);
}

/// Initialize logging with an explicit default level and format.
///
/// `RUST_LOG`, when set, still takes precedence over `level`.
pub fn init_with(level: &str, format: LogFormat) {
    tracing::init(level, format);
}
