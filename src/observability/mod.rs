//! Tracing with OpenTelemetry spans exported to a local file.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → FileSpanExporter → otlp.json
//! ```
//!
//! The level comes from `RUST_LOG` when set, otherwise from the `trace_level`
//! configuration key, otherwise `info`. Output lands in the data directory
//! and rotates at 10 MiB with three backups.

mod exporter;
mod init;
mod otlp;
mod rotating;

pub use exporter::{create_tracer_provider, FileSpanExporter};
pub use init::{init_tracing, resolve_filter, SERVICE_NAME};
pub use rotating::{RotatingFile, Rotation};
