//! Tracing subscriber setup.

use super::exporter::{file_tracer_provider, SCOPE_NAME};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber: an [`EnvFilter`], an OpenTelemetry layer
/// exporting to the OTLP file in the data directory, and, when
/// `log_to_stderr` is set, a human-readable layer on stderr.
///
/// The filter is `RUST_LOG` if set, otherwise `config.trace_level`, otherwise
/// `"info"`.
///
/// Observability is optional: if the data directory cannot be created the
/// file layer is skipped. Calling this twice is harmless; only the first call
/// installs a subscriber.
///
/// # Example
///
/// ```rust
/// use shelfsync::observability::init_tracing;
/// use shelfsync::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     data_dir: Some(std::env::temp_dir().join("shelfsync-doc").display().to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let trace_file = crate::infrastructure::trace_file(config);
    let otel_layer = trace_file
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .ok()
        .map(|()| {
            let resource = Resource::new(vec![
                opentelemetry::KeyValue::new("service.name", SCOPE_NAME),
                opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            ]);
            let provider = file_tracer_provider(trace_file, resource);
            OpenTelemetryLayer::new(provider.tracer(SCOPE_NAME))
        });

    let stderr_layer = config.log_to_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .with(stderr_layer)
        .try_init();
}
