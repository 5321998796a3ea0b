//! OpenTelemetry-based observability with file-based trace export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → OTLP JSON file
//!                ↘ fmt layer → stderr (optional)
//! ```
//!
//! - **File export**: spans go to `<data_dir>/shelfsync-otlp.json`, one OTLP
//!   document per line
//! - **Rotation**: at 10 MiB, keeping three numbered backups
//! - **Warnings**: non-fatal failures reach a [`WarningSink`]; the default
//!   forwards them to `tracing`
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - `exporter`: span exporter and OTLP JSON encoding
//! - `rotating`: size-rotated line writer
//! - [`sink`]: warning sink

mod exporter;
pub mod init;
mod rotating;
pub mod sink;

pub use init::init_tracing;
pub use sink::{TracingWarningSink, WarningSink};
