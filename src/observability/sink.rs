//! Sink for non-fatal failures (search errors, failed deletes, failed loads).

/// Receives warnings the user is not shown directly.
pub trait WarningSink {
    fn log_warning(&self, event: &str, context: &str);
}

/// Forwards warnings to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarningSink;

impl WarningSink for TracingWarningSink {
    fn log_warning(&self, event: &str, context: &str) {
        tracing::warn!(event, context, "operation failed");
    }
}
