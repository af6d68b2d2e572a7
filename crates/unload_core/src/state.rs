use std::path::PathBuf;

use crate::aggregate::{line_status, missing_count, missing_suffixes_iter, ordered_for_display};
use crate::view_model::{AppViewModel, LineRowView, MISSING_PREVIEW_LEN};
use crate::{Manifest, ScanOutcome, SessionState};

/// A processed scan as shown back to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRecord {
    pub raw: String,
    pub outcome: ScanOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: Option<SessionState>,
    manifest_source: Option<String>,
    last_scan: Option<ScanRecord>,
    last_error: Option<String>,
    last_export: Option<PathBuf>,
    scan_count: u64,
    completion_announced: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn scan_count(&self) -> u64 {
        self.scan_count
    }

    pub fn view(&self) -> AppViewModel {
        let mut view = AppViewModel {
            manifest_source: self.manifest_source.clone(),
            last_scan: self.last_scan.clone(),
            last_error: self.last_error.clone(),
            last_export: self.last_export.clone(),
            scan_count: self.scan_count,
            dirty: self.dirty,
            ..AppViewModel::default()
        };

        if let Some(session) = &self.session {
            let most_recent = session.most_recent();
            view.loaded = true;
            view.global_scanned = session.global_scanned();
            view.global_expected = session.global_expected();
            view.complete = session.is_complete();
            view.rows = ordered_for_display(session, most_recent)
                .into_iter()
                .map(|line| {
                    let lp = session.line_progress(line);
                    LineRowView {
                        primary_code: line.primary_code().to_owned(),
                        destination: line.destination().to_owned(),
                        scanned_total: lp.scanned_total(),
                        expected_quantity: line.expected_quantity(),
                        status: line_status(session, line),
                        missing_preview: missing_suffixes_iter(session, line)
                            .take(MISSING_PREVIEW_LEN)
                            .collect(),
                        missing_total: missing_count(session, line),
                        is_most_recent: most_recent == Some(line.primary_code()),
                    }
                })
                .collect();
        }
        view
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn take_session(&mut self) -> Option<SessionState> {
        self.session.take()
    }

    pub(crate) fn restore_session(&mut self, session: SessionState) {
        self.session = Some(session);
    }

    pub(crate) fn replace_manifest(&mut self, source: String, manifest: Manifest) {
        self.session = Some(SessionState::new(manifest));
        self.manifest_source = Some(source);
        self.last_scan = None;
        self.last_error = None;
        self.last_export = None;
        self.completion_announced = false;
        self.mark_dirty();
    }

    pub(crate) fn record_scan(&mut self, raw: String, outcome: ScanOutcome) {
        self.scan_count += 1;
        self.last_scan = Some(ScanRecord { raw, outcome });
        self.last_error = None;
        self.mark_dirty();
    }

    pub(crate) fn record_error(&mut self, error: String) {
        self.last_error = Some(error);
        self.mark_dirty();
    }

    pub(crate) fn record_export(&mut self, path: PathBuf) {
        self.last_export = Some(path);
        self.last_error = None;
        self.mark_dirty();
    }

    /// True the first time it is called after the session becomes complete.
    pub(crate) fn announce_completion(&mut self) -> bool {
        let complete = self.session.as_ref().is_some_and(SessionState::is_complete);
        if complete && !self.completion_announced {
            self.completion_announced = true;
            return true;
        }
        false
    }
}
