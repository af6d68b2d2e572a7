use std::path::PathBuf;

use crate::{LineStatus, ScanRecord};

/// Missing suffixes carried per row; the full list is only built for export.
pub const MISSING_PREVIEW_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub manifest_source: Option<String>,
    pub loaded: bool,
    /// Most recently scanned line first, then manifest order.
    pub rows: Vec<LineRowView>,
    pub global_scanned: u64,
    pub global_expected: u64,
    pub complete: bool,
    pub last_scan: Option<ScanRecord>,
    pub last_error: Option<String>,
    pub last_export: Option<PathBuf>,
    pub scan_count: u64,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRowView {
    pub primary_code: String,
    pub destination: String,
    pub scanned_total: u32,
    pub expected_quantity: u32,
    pub status: LineStatus,
    /// First missing suffixes in ascending order, at most [`MISSING_PREVIEW_LEN`].
    pub missing_preview: Vec<String>,
    pub missing_total: u32,
    pub is_most_recent: bool,
}
