//! Subscriber setup.

use super::exporter::create_tracer_provider;
use super::rotating::Rotation;
use crate::domain::Result;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name reported in the trace resource.
pub const SERVICE_NAME: &str = "roster";

const DEFAULT_LEVEL: &str = "info";

/// Filter directive: `RUST_LOG` when set, else the configured level, else `info`.
#[must_use]
pub fn resolve_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    })
}

/// Installs the global subscriber exporting spans to the trace file in the
/// data directory.
///
/// Calling this more than once is harmless; only the first call installs a
/// subscriber.
///
/// # Errors
///
/// Returns an error if the data directory can't be resolved or created.
pub fn init_tracing(config: &Config) -> Result<()> {
    let data_dir = paths::resolve_data_dir(config.data_dir.as_deref())?;
    std::fs::create_dir_all(&data_dir)?;

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = create_tracer_provider(paths::trace_path(&data_dir), Rotation::default(), resource);
    let tracer = provider.tracer(SERVICE_NAME);

    let installed = tracing_subscriber::registry()
        .with(resolve_filter(config))
        .with(OpenTelemetryLayer::new(tracer))
        .try_init()
        .is_ok();

    if installed {
        let _previous = opentelemetry::global::set_tracer_provider(provider);
    }
    tracing::debug!(installed, dir = ?data_dir, "tracing initialized");
    Ok(())
}
