//! Unload core: manifest model, scan reconciliation, and the pure session state machine.
mod aggregate;
mod effect;
mod manifest;
mod msg;
mod reconcile;
mod resolve;
mod session;
mod state;
mod update;
mod view_model;

pub use aggregate::{
    global_summary, line_report, line_status, missing_count, missing_suffixes,
    missing_suffixes_iter, ordered_for_display, report_snapshot, LineReport, LineStatus,
    ReportSnapshot,
};
pub use effect::Effect;
pub use manifest::{Manifest, ManifestError, ManifestLine, SUFFIX_SEPARATOR};
pub use msg::Msg;
pub use reconcile::{apply_scan, RejectReason, ScanOutcome};
pub use resolve::{resolve, split_scan, ResolutionError, ResolvedScan};
pub use session::{LineProgress, SessionState};
pub use state::{AppState, ScanRecord};
pub use update::update;
pub use view_model::{AppViewModel, LineRowView, MISSING_PREVIEW_LEN};
