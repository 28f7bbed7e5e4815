//! Export of the derived student set.
//!
//! Both formats export exactly what the list shows before pagination: the
//! filtered and sorted set, not the current page and not the full set.

use crate::domain::{Result, RosterError, Student};
use crate::listview::FilterSpec;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Column headers of the CSV export.
pub const CSV_HEADERS: [&str; 7] = [
    "ID",
    "Nome",
    "Idade",
    "Data de Nascimento",
    "Email",
    "Status",
    "Turma",
];

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Parses `csv` / `json` (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
        })
    }
}

/// A rendered export, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested file name, e.g. `alunos_2024-06-01.csv`.
    pub file_name: String,
    pub contents: String,
    pub record_count: usize,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    exported_at: String,
    total_records: usize,
    filters_applied: BTreeMap<String, String>,
    alunos: &'a [Student],
}

/// Writes `students` as CSV with [`CSV_HEADERS`] to `writer`.
///
/// # Errors
///
/// Returns [`RosterError::Export`] if a row can't be written.
pub fn write_csv<W: Write>(students: &[Student], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS).map_err(csv_error)?;

    for student in students {
        csv_writer
            .write_record([
                student.id.to_string(),
                student.name.clone(),
                student.age.to_string(),
                student.birth_date.to_string(),
                student.email.clone().unwrap_or_default(),
                student.status.as_str().to_string(),
                student.class_name.clone().unwrap_or_default(),
            ])
            .map_err(csv_error)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Renders `students` as a pretty-printed JSON export document.
///
/// # Errors
///
/// Returns [`RosterError::Export`] if serialization fails.
pub fn to_json(
    students: &[Student],
    filters: &FilterSpec,
    exported_at: DateTime<Utc>,
) -> Result<String> {
    let document = JsonExport {
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        total_records: students.len(),
        filters_applied: filters.to_map(),
        alunos: students,
    };
    serde_json::to_string_pretty(&document)
        .map_err(|e| RosterError::Export(format!("failed to serialize export: {e}")))
}

/// Renders the export file for `students`.
///
/// # Errors
///
/// Returns [`RosterError::Export`] when `students` is empty or rendering fails.
pub fn export_students(
    format: ExportFormat,
    students: &[Student],
    filters: &FilterSpec,
    now: DateTime<Utc>,
) -> Result<ExportFile> {
    let _span = tracing::debug_span!("export", %format, count = students.len()).entered();

    if students.is_empty() {
        return Err(RosterError::Export("no students to export".to_string()));
    }

    let contents = match format {
        ExportFormat::Csv => {
            let mut buffer = Vec::new();
            write_csv(students, &mut buffer)?;
            String::from_utf8(buffer)
                .map_err(|e| RosterError::Export(format!("export is not valid UTF-8: {e}")))?
        }
        ExportFormat::Json => to_json(students, filters, now)?,
    };

    let file_name = format!("alunos_{}.{}", now.format("%Y-%m-%d"), format.extension());
    tracing::debug!(%file_name, bytes = contents.len(), "export rendered");

    Ok(ExportFile {
        file_name,
        contents,
        record_count: students.len(),
    })
}

fn csv_error(e: csv::Error) -> RosterError {
    RosterError::Export(format!("failed to write CSV: {e}"))
}
