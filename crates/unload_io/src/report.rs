use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;
use unload_core::{LineReport, LineStatus, ReportSnapshot};
use unload_logging::unload_info;

use crate::filename::report_basename;
use crate::persist::{PersistError, ReportBundle};

/// Separator used to flatten suffix lists into one CSV cell.
pub const SUFFIX_LIST_SEPARATOR: &str = "|";

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    pub stem: String,
    /// Also write `{basename}.summary.json` next to the CSV.
    pub write_summary: bool,
}

impl ReportOptions {
    pub fn new(output_dir: PathBuf, stem: impl Into<String>) -> Self {
        Self {
            output_dir,
            stem: stem.into(),
            write_summary: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub line_count: usize,
    pub global_scanned: u64,
    pub global_expected: u64,
    pub csv_path: PathBuf,
    pub summary_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    primary_code: &'a str,
    destination: &'a str,
    scanned: u32,
    expected: u32,
    status: &'static str,
    confirmed_suffixes: String,
    missing_suffixes: String,
}

impl<'a> From<&'a LineReport> for ReportRow<'a> {
    fn from(line: &'a LineReport) -> Self {
        Self {
            primary_code: &line.primary_code,
            destination: &line.destination,
            scanned: line.scanned_total,
            expected: line.expected_quantity,
            status: line.status.as_str(),
            confirmed_suffixes: line.confirmed_suffixes.join(SUFFIX_LIST_SEPARATOR),
            missing_suffixes: line.missing_suffixes.join(SUFFIX_LIST_SEPARATOR),
        }
    }
}

/// Render the per-line report as CSV bytes, one row per manifest line.
pub fn render_report_csv(snapshot: &ReportSnapshot) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for line in &snapshot.lines {
        writer.serialize(ReportRow::from(line))?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

fn render_summary_json(snapshot: &ReportSnapshot, generated_utc: &str) -> Result<String, ExportError> {
    let summary = json!({
        "generated_utc": generated_utc,
        "global_scanned": snapshot.global_scanned,
        "global_expected": snapshot.global_expected,
        "complete": snapshot.is_complete(),
        "lines": {
            "total": snapshot.lines.len(),
            "complete": snapshot.count_with_status(LineStatus::Complete),
            "partial": snapshot.count_with_status(LineStatus::PartiallyScanned),
            "incomplete": snapshot.count_with_status(LineStatus::Incomplete),
        },
        "pending": snapshot.lines.iter()
            .filter(|line| line.status != LineStatus::Complete)
            .map(|line| json!({
                "primary_code": line.primary_code,
                "destination": line.destination,
                "scanned": line.scanned_total,
                "expected": line.expected_quantity,
                "missing_suffixes": line.missing_suffixes,
            }))
            .collect::<Vec<_>>(),
    });
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Write the completion report for `snapshot` into `options.output_dir`.
pub fn export_report(
    snapshot: &ReportSnapshot,
    generated_utc: &str,
    options: &ReportOptions,
) -> Result<ExportSummary, ExportError> {
    let basename = report_basename(
        &options.stem,
        snapshot.lines.iter().map(|line| line.primary_code.as_str()),
    );
    let csv_bytes = render_report_csv(snapshot)?;
    let summary_json = if options.write_summary {
        Some(render_summary_json(snapshot, generated_utc)?)
    } else {
        None
    };

    let mut bundle = ReportBundle::new(options.output_dir.clone())?;
    let csv_path = bundle.stage(&format!("{basename}.csv"), &csv_bytes)?;
    let summary_path = match &summary_json {
        Some(json) => Some(bundle.stage(&format!("{basename}.summary.json"), json.as_bytes())?),
        None => None,
    };
    bundle.publish()?;

    unload_info!(
        "report written to {:?} ({}/{} units)",
        csv_path,
        snapshot.global_scanned,
        snapshot.global_expected
    );

    Ok(ExportSummary {
        line_count: snapshot.lines.len(),
        global_scanned: snapshot.global_scanned,
        global_expected: snapshot.global_expected,
        csv_path,
        summary_path,
    })
}
