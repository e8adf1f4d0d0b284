//! Report serialization.
//!
//! Renders a [`BatchReport`] to JSON or Markdown. Rendering is total over
//! well-formed reports: cells that need escaping are escaped, failed units
//! are rendered visibly, and nothing is silently omitted. Array order
//! mirrors `BatchReport::outcomes`, JSON key order follows the struct field
//! order of the data model, so output is deterministic.

use crate::Result;
use crate::types::{BatchReport, ExtractionOutcome, Table};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output artifact format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

impl OutputFormat {
    /// Artifact file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: '{other}'")),
        }
    }
}

/// Render a report in the requested format.
pub fn render(report: &BatchReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Markdown => Ok(to_markdown(report)),
    }
}

/// Render the outcome sequence as pretty-printed JSON.
///
/// Successful units serialize as `{"page", "tables"}`, failed units as
/// `{"page", "error": {"kind", "message"}}`, in report order. Each table
/// object carries `{"index", "rows", "confidence"?, "method", "page"}`:
/// the table-level `page` duplicates the unit-level one so a table value
/// stays self-describing when lifted out of its report.
pub fn to_json(report: &BatchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&report.outcomes)?)
}

/// Render the report as Markdown: one heading per unit, one pipe table per
/// extracted table, failures as visible inline error notes.
pub fn to_markdown(report: &BatchReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        match outcome {
            ExtractionOutcome::Success { page, tables } => {
                out.push_str(&format!("## Page {page}\n\n"));
                if tables.is_empty() {
                    out.push_str("_No tables detected._\n\n");
                }
                for table in tables {
                    render_markdown_table(&mut out, table);
                }
            }
            ExtractionOutcome::Failure { page, error } => {
                out.push_str(&format!("## Page {page}\n\n"));
                out.push_str(&format!(
                    "> **Extraction failed** ({}): {}\n\n",
                    serde_kind(error.kind),
                    escape_cell(&error.message)
                ));
            }
        }
    }
    out
}

/// Derive the artifact path for a source document: `<stem>_tables.<ext>`
/// under `output_dir`, or next to the source when no directory is given.
pub fn artifact_path(source: &Path, output_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let stem = source
        .file_stem()
        .map_or_else(|| "output".to_string(), |s| s.to_string_lossy().into_owned());
    let file_name = format!("{stem}_tables.{}", format.extension());
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| source.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(file_name)
}

/// Render and persist the report, returning the artifact path.
///
/// # Errors
///
/// `TafelError::Io` when the output directory cannot be created or the file
/// cannot be written.
pub fn write_artifact(
    report: &BatchReport,
    source: &Path,
    output_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<PathBuf> {
    let path = artifact_path(source, output_dir, format);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let rendered = render(report, format)?;
    std::fs::write(&path, rendered)?;
    Ok(path)
}

fn render_markdown_table(out: &mut String, table: &Table) {
    let provenance = match table.confidence {
        Some(c) => format!("{}, confidence {c:.2}", table.method),
        None => table.method.to_string(),
    };
    out.push_str(&format!("### Table {} ({provenance})\n\n", table.index));

    let mut rows = table.rows.iter();
    let Some(header) = rows.next() else {
        return;
    };
    out.push_str(&markdown_row(header));
    out.push_str(&separator_row(header.len()));
    for row in rows {
        out.push_str(&markdown_row(row));
    }
    out.push('\n');
}

fn markdown_row(cells: &[String]) -> String {
    let rendered: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    format!("| {} |\n", rendered.join(" | "))
}

fn separator_row(width: usize) -> String {
    let dashes = vec!["---"; width];
    format!("| {} |\n", dashes.join(" | "))
}

/// Escape a cell for Markdown table context: pipes become literal, embedded
/// newlines are flattened to spaces.
fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\n', '\r'], " ")
}

fn serde_kind(kind: crate::types::FailureKind) -> &'static str {
    match kind {
        crate::types::FailureKind::Backend => "backend",
        crate::types::FailureKind::InvalidRange => "invalid_range",
        crate::types::FailureKind::Other => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtractionMethod, FailureKind, OutcomeError};

    fn sample_table() -> Table {
        Table {
            index: 0,
            rows: vec![
                vec!["Name".to_string(), "Qty".to_string()],
                vec!["Bolt M4".to_string(), "12".to_string()],
            ],
            confidence: Some(0.91),
            method: ExtractionMethod::Scanned,
            page: 1,
        }
    }

    fn sample_report() -> BatchReport {
        BatchReport::new(vec![
            ExtractionOutcome::Success {
                page: 1,
                tables: vec![sample_table()],
            },
            ExtractionOutcome::Success { page: 2, tables: vec![] },
            ExtractionOutcome::Failure {
                page: 3,
                error: OutcomeError {
                    kind: FailureKind::Backend,
                    message: "OCR engine crashed".to_string(),
                },
            },
        ])
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let json = to_json(&report).unwrap();
        let recovered: Vec<ExtractionOutcome> = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, report.outcomes);
    }

    #[test]
    fn test_json_mirrors_outcome_order() {
        let json = to_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let pages: Vec<u64> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["page"].as_u64().unwrap())
            .collect();
        assert_eq!(pages, vec![1, 2, 3]);
        assert_eq!(value[2]["error"]["kind"], "backend");
    }

    #[test]
    fn test_json_table_objects_are_self_describing() {
        let json = to_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let table = &value[0]["tables"][0];
        assert_eq!(table["index"], 0);
        assert_eq!(table["method"], "scanned");
        // A table records its own page, matching the unit it came from.
        assert_eq!(table["page"], 1);
        assert_eq!(table["page"], value[0]["page"]);
    }

    #[test]
    fn test_markdown_contains_table_and_error_note() {
        let md = to_markdown(&sample_report());
        assert!(md.contains("## Page 1"));
        assert!(md.contains("| Name | Qty |"));
        assert!(md.contains("| --- | --- |"));
        assert!(md.contains("| Bolt M4 | 12 |"));
        assert!(md.contains("_No tables detected._"));
        // Failures are rendered, never silently omitted.
        assert!(md.contains("## Page 3"));
        assert!(md.contains("**Extraction failed** (backend): OCR engine crashed"));
    }

    #[test]
    fn test_markdown_escapes_pipes_and_newlines() {
        let mut table = sample_table();
        table.rows[1][0] = "a|b\nc".to_string();
        let report = BatchReport::new(vec![ExtractionOutcome::Success {
            page: 1,
            tables: vec![table],
        }]);
        let md = to_markdown(&report);
        assert!(md.contains("a\\|b c"));
    }

    #[test]
    fn test_markdown_confidence_shown_only_when_present() {
        let mut table = sample_table();
        table.confidence = None;
        let report = BatchReport::new(vec![ExtractionOutcome::Success {
            page: 1,
            tables: vec![table],
        }]);
        let md = to_markdown(&report);
        assert!(md.contains("### Table 0 (scanned)"));
        assert!(!md.contains("confidence"));
    }

    #[test]
    fn test_artifact_path_naming() {
        let path = artifact_path(Path::new("/data/in/report Q3.pdf"), Some(Path::new("/out")), OutputFormat::Json);
        assert_eq!(path, PathBuf::from("/out/report Q3_tables.json"));

        let beside = artifact_path(Path::new("/data/in/scan.pdf"), None, OutputFormat::Markdown);
        assert_eq!(beside, PathBuf::from("/data/in/scan_tables.md"));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("MD".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_write_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(
            &sample_report(),
            Path::new("invoice.pdf"),
            Some(dir.path()),
            OutputFormat::Json,
        )
        .unwrap();
        assert_eq!(path.file_name().unwrap(), "invoice_tables.json");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"page\": 1"));
    }
}
