use unload_core::{AppViewModel, LineRowView, ScanOutcome, ScanRecord};

use super::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    /// Feedback, counter and the first few rows.
    Compact,
    /// Every manifest line.
    Full,
}

pub fn render(view: &AppViewModel, detail: Detail) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(scan) = &view.last_scan {
        lines.push(format_feedback(scan));
    }
    if let Some(error) = &view.last_error {
        lines.push(format!("error: {error}"));
    }
    if let Some(path) = &view.last_export {
        lines.push(format!("Report written to {}", path.display()));
    }

    if !view.loaded {
        lines.push("No manifest loaded. Type :load <file>.".to_string());
        return lines;
    }

    if detail == Detail::Full {
        if let Some(source) = &view.manifest_source {
            lines.push(format!("Manifest: {source} ({} lines)", view.rows.len()));
        }
    }

    let mut counter = format!(
        "Units unloaded: {} of {}",
        view.global_scanned, view.global_expected
    );
    if view.complete {
        counter.push_str("  ALL UNITS UNLOADED");
    }
    lines.push(counter);

    let limit = match detail {
        Detail::Compact => COMPACT_ROWS,
        Detail::Full => view.rows.len(),
    };
    let code_width = view
        .rows
        .iter()
        .map(|row| row.primary_code.chars().count())
        .max()
        .unwrap_or(0);
    lines.extend(
        view.rows
            .iter()
            .take(limit)
            .map(|row| format_row(row, code_width)),
    );
    if view.rows.len() > limit {
        lines.push(format!(
            "  ... {} more lines (:status shows all)",
            view.rows.len() - limit
        ));
    }

    lines
}

fn format_feedback(scan: &ScanRecord) -> String {
    match &scan.outcome {
        ScanOutcome::Accepted {
            primary_code,
            suffix,
            scanned_total,
            expected_quantity,
        } => {
            let unit = match suffix {
                Some(suffix) => format!("{primary_code} unit {suffix}"),
                None => primary_code.clone(),
            };
            format!(
                "OK        {}  {unit} ({scanned_total} of {expected_quantity})",
                scan.raw
            )
        }
        ScanOutcome::Rejected {
            reason,
            primary_code,
        } => match primary_code {
            Some(code) => format!("REJECTED  {}  {code}: {reason}", scan.raw),
            None => format!("REJECTED  {}  {reason}", scan.raw),
        },
    }
}

fn format_row(row: &LineRowView, code_width: usize) -> String {
    let marker = if row.is_most_recent { MARKER_RECENT } else { ' ' };
    let mut text = format!(
        "{marker} {code:<code_width$} [{bar}] {scanned:>4}/{expected:<4} {status:<10} {destination}",
        code = row.primary_code,
        bar = progress_bar(row.scanned_total, row.expected_quantity),
        scanned = row.scanned_total,
        expected = row.expected_quantity,
        status = row.status.as_str(),
        destination = row.destination,
    );
    if !row.missing_preview.is_empty() {
        text.push_str("  missing ");
        text.push_str(&format_suffixes(&row.missing_preview, row.missing_total));
    }
    text
}

fn format_suffixes(preview: &[String], total: u32) -> String {
    let listed = preview.join(", ");
    match (total as usize).saturating_sub(preview.len()) {
        0 => listed,
        rest => format!("{listed} (+{rest} more)"),
    }
}

fn progress_bar(scanned: u32, expected: u32) -> String {
    let filled = if expected == 0 {
        BAR_WIDTH
    } else {
        (u64::from(scanned.min(expected)) * BAR_WIDTH as u64 / u64::from(expected)) as usize
    };
    let mut bar = String::with_capacity(BAR_WIDTH);
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(BAR_WIDTH - filled));
    bar
}

#[cfg(test)]
mod tests {
    use unload_core::{update, AppState, LineStatus, Manifest, ManifestLine, Msg, RejectReason};

    use super::*;

    fn view_after(scans: &[&str]) -> AppViewModel {
        let manifest = Manifest::new(vec![
            ManifestLine::new("A1", 3, "Lima"),
            ManifestLine::new("B2", 1, "Cusco"),
        ])
        .unwrap();
        let (mut state, _) = update(
            AppState::new(),
            Msg::ManifestLoaded {
                source: "camion.csv".into(),
                manifest,
            },
        );
        for scan in scans {
            state = update(state, Msg::ScanSubmitted((*scan).to_string())).0;
        }
        state.view()
    }

    #[test]
    fn compact_view_shows_feedback_counter_and_rows() {
        let lines = render(&view_after(&["A1-2"]), Detail::Compact);
        assert_eq!(lines[0], "OK        A1-2  A1 unit 2 (1 of 3)");
        assert_eq!(lines[1], "Units unloaded: 1 of 4");
        assert!(lines[2].starts_with("> A1 [######..............]"), "{}", lines[2]);
        assert!(lines[2].ends_with("missing 1, 3"), "{}", lines[2]);
        assert!(lines[3].starts_with("  B2 [....................]"), "{}", lines[3]);
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn rejection_names_reason_and_line() {
        let lines = render(&view_after(&["B2", "B2"]), Detail::Compact);
        assert_eq!(
            lines[0],
            format!("REJECTED  B2  B2: {}", RejectReason::QuotaExceeded)
        );
    }

    #[test]
    fn completion_is_flagged_on_the_counter() {
        let lines = render(&view_after(&["A1-1", "A1-2", "A1-3", "B2"]), Detail::Full);
        assert_eq!(lines[1], "Manifest: camion.csv (2 lines)");
        assert_eq!(lines[2], "Units unloaded: 4 of 4  ALL UNITS UNLOADED");
    }

    #[test]
    fn compact_view_truncates_long_manifests() {
        let rows = (0..COMPACT_ROWS + 2)
            .map(|i| LineRowView {
                primary_code: format!("P{i}"),
                destination: "Lima".into(),
                scanned_total: 0,
                expected_quantity: 1,
                status: LineStatus::Incomplete,
                missing_preview: vec!["1".into()],
                missing_total: 1,
                is_most_recent: false,
            })
            .collect();
        let view = AppViewModel {
            loaded: true,
            rows,
            ..AppViewModel::default()
        };
        let compact = render(&view, Detail::Compact);
        assert_eq!(
            compact.last().unwrap(),
            "  ... 2 more lines (:status shows all)"
        );
        assert_eq!(render(&view, Detail::Full).len(), COMPACT_ROWS + 3);
    }

    #[test]
    fn long_suffix_lists_are_summarised() {
        let preview: Vec<String> = (1..=8).map(|i| i.to_string()).collect();
        assert_eq!(
            format_suffixes(&preview, 3_999_999_999),
            "1, 2, 3, 4, 5, 6, 7, 8 (+3999999991 more)"
        );
        assert_eq!(format_suffixes(&preview[..2], 2), "1, 2");
        assert_eq!(progress_bar(5, 5), "#".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(1, 4_000_000_000), ".".repeat(BAR_WIDTH));
    }

    #[test]
    fn nothing_loaded_prompts_for_manifest() {
        let lines = render(&AppViewModel::default(), Detail::Compact);
        assert_eq!(lines, vec!["No manifest loaded. Type :load <file>.".to_string()]);
    }
}
