//! File-backed OpenTelemetry span exporter.

use super::otlp;
use super::rotating::{RotatingFile, Rotation};
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;

/// Writes each exported batch as one OTLP/JSON line.
#[derive(Debug)]
pub struct FileSpanExporter {
    file: RotatingFile,
    resource: Resource,
    shut_down: bool,
}

impl FileSpanExporter {
    #[must_use]
    pub const fn new(path: PathBuf, rotation: Rotation, resource: Resource) -> Self {
        Self {
            file: RotatingFile::new(path, rotation),
            resource,
            shut_down: false,
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        if self.shut_down {
            return Err(TraceError::from("file exporter is shut down"));
        }
        let line = otlp::encode_batch(&self.resource, batch).to_string();
        self.file
            .write_line(&line)
            .map_err(|e| TraceError::from(format!("failed to write spans: {e}")))
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = self.write_batch(&batch);
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.resource = resource.clone();
    }
}

/// Builds a tracer provider that exports every finished span synchronously
/// to `path`.
#[must_use]
pub fn create_tracer_provider(path: PathBuf, rotation: Rotation, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter::new(path, rotation, resource.clone());
    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::KeyValue;
    use tempfile::TempDir;

    #[test]
    fn shut_down_exporter_refuses_batches() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("otlp.json");
        let mut exporter = FileSpanExporter::new(
            path.clone(),
            Rotation::default(),
            Resource::new(vec![KeyValue::new("service.name", "roster")]),
        );

        assert!(exporter.write_batch(&[]).is_ok());
        assert!(std::fs::read_to_string(&path).unwrap().contains("resourceSpans"));

        exporter.shutdown();
        assert!(exporter.write_batch(&[]).is_err());
    }
}
