//! CSV/ZIP rendering for the `/summary` endpoints.
//!
//! A summary is serialized to JSON, flattened into `(field, value)` rows,
//! rendered as CSV text in memory, and wrapped in a single-entry ZIP archive
//! built over an in-memory cursor. No temp files are written.

use std::io::{Cursor, Write};

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use zip::write::SimpleFileOptions;

use crate::error::{AppError, AppResult};

/// Export rendering selected by the `format` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Parse the `format` parameter; absent means JSON.
    pub fn parse(value: Option<&str>) -> AppResult<Self> {
        match value {
            None | Some("json") => Ok(ExportFormat::Json),
            Some("csv") => Ok(ExportFormat::Csv),
            Some(other) => Err(AppError::BadRequest(format!(
                "format must be 'json' or 'csv', got '{other}'"
            ))),
        }
    }
}

/// Render a serialized summary as a ZIP attachment response.
///
/// `basename` names both the CSV entry inside the archive and the download
/// (`<basename>.csv` inside `<basename>.zip`).
pub fn csv_zip_response(basename: &str, summary: &Value) -> AppResult<Response> {
    let csv = summary_to_csv(summary);
    let archive = zip_single_file(&format!("{basename}.csv"), csv.as_bytes())?;

    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/zip")
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{basename}.zip\""),
        )
        .body(Body::from(archive))
        .map_err(|e| AppError::InternalError(format!("Failed to build export response: {e}")))?
        .into_response())
}

/// Flatten a summary JSON document into `field,value` CSV rows.
pub fn summary_to_csv(summary: &Value) -> String {
    let mut rows = Vec::new();
    flatten("", summary, &mut rows);

    let mut out = String::from("field,value\n");
    for (field, value) in rows {
        out.push_str(&format!("{},{}\n", escape(&field), escape(&value)));
    }
    out
}

/// Depth-first flattening: objects join keys with `.`, arrays index.
fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, rows);
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                flatten(&format!("{prefix}.{idx}"), child, rows);
            }
        }
        Value::Null => rows.push((prefix.to_string(), String::new())),
        Value::String(s) => rows.push((prefix.to_string(), s.clone())),
        other => rows.push((prefix.to_string(), other.to_string())),
    }
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Build a ZIP archive holding a single file, fully in memory.
fn zip_single_file(name: &str, contents: &[u8]) -> AppResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        writer
            .start_file(name, SimpleFileOptions::default())
            .map_err(|e| AppError::InternalError(format!("Failed to start ZIP entry: {e}")))?;
        writer
            .write_all(contents)
            .map_err(|e| AppError::InternalError(format!("Failed to write ZIP entry: {e}")))?;
        writer
            .finish()
            .map_err(|e| AppError::InternalError(format!("Failed to finish ZIP archive: {e}")))?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_parsing() {
        assert_eq!(ExportFormat::parse(None).unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::parse(Some("csv")).unwrap(), ExportFormat::Csv);
        assert!(ExportFormat::parse(Some("xml")).is_err());
    }

    #[test]
    fn flattens_nested_summary() {
        let summary = json!({
            "fruits": ["raspberry", "apple"],
            "total": "4596",
            "best_harvest": { "id": 1, "fruit": "raspberry" },
            "best_employee": null,
        });

        let csv = summary_to_csv(&summary);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "field,value");
        assert!(lines.contains(&"fruits.0,raspberry"));
        assert!(lines.contains(&"best_harvest.id,1"));
        assert!(lines.contains(&"best_employee,"));
        assert!(lines.contains(&"total,4596"));
    }

    #[test]
    fn escapes_commas_and_quotes() {
        let summary = json!({ "note": "a,b \"c\"" });
        let csv = summary_to_csv(&summary);
        assert!(csv.contains("note,\"a,b \"\"c\"\"\""));
    }

    #[test]
    fn zip_archive_is_well_formed() {
        let bytes = zip_single_file("summary.csv", b"field,value\n").unwrap();
        // ZIP local file header magic.
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }
}
