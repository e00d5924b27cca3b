//! Tracing and logging (shared setup).

pub mod config;

/// Tracing subscriber installation (filters, formatting).
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig};

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops. An
/// unparsable filter falls back to `info`.
pub fn init(config: &ObservabilityConfig) {
    crate::tracing::init(config);
}

/// Like [`init`], but reports an invalid filter or an already-installed
/// subscriber instead of ignoring it.
pub fn try_init(config: &ObservabilityConfig) -> anyhow::Result<()> {
    crate::tracing::try_init(config)
}
