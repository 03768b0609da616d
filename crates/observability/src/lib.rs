//! Tracing and logging (shared setup for the server and the CLI).

/// Initialize process-wide observability (JSON for the server, text for the CLI).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    tracing::init(format);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogFormat;
