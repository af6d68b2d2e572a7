use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use unload_core::{apply_scan, report_snapshot, Manifest, ManifestLine, SessionState};
use unload_io::{export_report, render_report_csv, ReportOptions};

fn snapshot() -> unload_core::ReportSnapshot {
    let manifest = Manifest::new(vec![
        ManifestLine::new("A1", 3, "Lima"),
        ManifestLine::new("B2", 1, "Cusco"),
    ])
    .unwrap();
    let state = SessionState::new(manifest);
    let (_, state) = apply_scan(state, "A1-3");
    let (_, state) = apply_scan(state, "A1-1");
    let (_, state) = apply_scan(state, "B2");
    report_snapshot(&state)
}

#[test]
fn csv_has_one_row_per_line_in_manifest_order() {
    let bytes = render_report_csv(&snapshot()).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(
        text,
        "\
primary_code,destination,scanned,expected,status,confirmed_suffixes,missing_suffixes
A1,Lima,2,3,partial,1|3,2
B2,Cusco,1,1,complete,,
"
    );
}

#[test]
fn export_writes_csv_and_summary() {
    let temp = TempDir::new().unwrap();
    let options = ReportOptions::new(temp.path().join("reports"), "truck 7");

    let summary = export_report(&snapshot(), "2026-01-01T00:00:00Z", &options).unwrap();
    assert_eq!(summary.line_count, 2);
    assert_eq!(summary.global_scanned, 3);
    assert_eq!(summary.global_expected, 4);

    let name = summary.csv_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("truck_7--"), "{name}");
    assert!(name.ends_with(".csv"));
    assert!(fs::read_to_string(&summary.csv_path).unwrap().contains("A1,Lima,2,3"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(summary.summary_path.unwrap()).unwrap()).unwrap();
    assert_eq!(json["generated_utc"], "2026-01-01T00:00:00Z");
    assert_eq!(json["complete"], false);
    assert_eq!(json["lines"]["complete"], 1);
    assert_eq!(json["lines"]["partial"], 1);
    assert_eq!(json["pending"][0]["primary_code"], "A1");
    assert_eq!(json["pending"][0]["missing_suffixes"][0], "2");
}

#[test]
fn re_export_replaces_previous_report() {
    let temp = TempDir::new().unwrap();
    let mut options = ReportOptions::new(temp.path().to_path_buf(), "manifest");
    options.write_summary = false;

    let first = export_report(&snapshot(), "t1", &options).unwrap();
    let second = export_report(&snapshot(), "t2", &options).unwrap();
    assert_eq!(first.csv_path, second.csv_path);
    assert!(second.summary_path.is_none());

    let files: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
}
