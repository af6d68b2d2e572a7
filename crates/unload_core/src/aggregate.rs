//! Read-only projections over a [`SessionState`] for display and export.

use std::fmt;

use crate::manifest::ManifestLine;
use crate::session::{LineProgress, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStatus {
    Incomplete,
    PartiallyScanned,
    Complete,
}

impl LineStatus {
    pub fn from_counts(scanned: u32, expected: u32) -> Self {
        if scanned >= expected {
            LineStatus::Complete
        } else if scanned > 0 {
            LineStatus::PartiallyScanned
        } else {
            LineStatus::Incomplete
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineStatus::Incomplete => "incomplete",
            LineStatus::PartiallyScanned => "partial",
            LineStatus::Complete => "complete",
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-line export row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReport {
    pub primary_code: String,
    pub destination: String,
    pub scanned_total: u32,
    pub expected_quantity: u32,
    pub status: LineStatus,
    pub confirmed_suffixes: Vec<String>,
    pub missing_suffixes: Vec<String>,
}

/// Everything the report collaborator needs, detached from the live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSnapshot {
    pub lines: Vec<LineReport>,
    pub global_scanned: u64,
    pub global_expected: u64,
}

impl ReportSnapshot {
    pub fn is_complete(&self) -> bool {
        self.global_scanned == self.global_expected
    }

    pub fn count_with_status(&self, status: LineStatus) -> usize {
        self.lines.iter().filter(|line| line.status == status).count()
    }
}

pub fn line_status(state: &SessionState, line: &ManifestLine) -> LineStatus {
    let lp = state.line_progress(line);
    LineStatus::from_counts(lp.scanned_total(), line.expected_quantity())
}

/// Unit suffixes `"1".."N"` not yet confirmed, in ascending numeric order.
///
/// Empty exactly when the line is complete. Allocates one string per missing
/// unit; display code should use [`missing_suffixes_iter`] with a limit.
pub fn missing_suffixes(state: &SessionState, line: &ManifestLine) -> Vec<String> {
    missing_iter(state.line_progress(line), line.expected_quantity()).collect()
}

/// Lazy form of [`missing_suffixes`]; taking the first `k` items costs
/// `O(k + confirmed suffixes)` regardless of the line quantity.
pub fn missing_suffixes_iter<'a>(
    state: &'a SessionState,
    line: &ManifestLine,
) -> impl Iterator<Item = String> + 'a {
    missing_iter(state.line_progress(line), line.expected_quantity())
}

/// Length of [`missing_suffixes`], computed without enumerating it.
pub fn missing_count(state: &SessionState, line: &ManifestLine) -> u32 {
    let lp = state.line_progress(line);
    let expected = line.expected_quantity();
    if lp.scanned_total() >= expected {
        return 0;
    }
    let confirmed_units = lp
        .confirmed_suffixes()
        .iter()
        .filter(|suffix| is_unit_suffix(suffix, expected))
        .count() as u32;
    expected - confirmed_units
}

fn missing_iter(lp: &LineProgress, expected: u32) -> impl Iterator<Item = String> + '_ {
    let upper = if lp.scanned_total() >= expected { 0 } else { expected };
    (1..=upper)
        .map(|n| n.to_string())
        .filter(move |suffix| !lp.confirmed_suffixes().contains(suffix))
}

// True for the canonical spelling of a unit number in `1..=expected`.
fn is_unit_suffix(suffix: &str, expected: u32) -> bool {
    suffix
        .parse::<u32>()
        .is_ok_and(|n| (1..=expected).contains(&n) && n.to_string() == suffix)
}

pub fn global_summary(state: &SessionState) -> (u64, u64) {
    (state.global_scanned(), state.global_expected())
}

/// Manifest order with the `most_recent` line, if any, moved to the front.
pub fn ordered_for_display<'a>(
    state: &'a SessionState,
    most_recent: Option<&str>,
) -> Vec<&'a ManifestLine> {
    let lines = state.manifest().lines();
    let mut ordered = Vec::with_capacity(lines.len());
    let front = most_recent.and_then(|code| lines.iter().find(|l| l.primary_code() == code));
    if let Some(line) = front {
        ordered.push(line);
    }
    ordered.extend(
        lines
            .iter()
            .filter(|line| Some(line.primary_code()) != front.map(ManifestLine::primary_code)),
    );
    ordered
}

pub fn line_report(state: &SessionState, line: &ManifestLine) -> LineReport {
    let lp = state.line_progress(line);
    let expected = line.expected_quantity();
    let mut confirmed: Vec<String> = lp.confirmed_suffixes().iter().cloned().collect();
    confirmed.sort_by(|a, b| suffix_order(a, b));
    LineReport {
        primary_code: line.primary_code().to_owned(),
        destination: line.destination().to_owned(),
        scanned_total: lp.scanned_total(),
        expected_quantity: expected,
        status: LineStatus::from_counts(lp.scanned_total(), expected),
        confirmed_suffixes: confirmed,
        missing_suffixes: missing_iter(lp, expected).collect(),
    }
}

/// Export rows in manifest order.
pub fn report_snapshot(state: &SessionState) -> ReportSnapshot {
    let (global_scanned, global_expected) = global_summary(state);
    ReportSnapshot {
        lines: state
            .manifest()
            .lines()
            .iter()
            .map(|line| line_report(state, line))
            .collect(),
        global_scanned,
        global_expected,
    }
}

// Numeric suffixes first in numeric order, then the rest lexically.
fn suffix_order(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
