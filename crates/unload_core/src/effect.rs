use std::path::PathBuf;

use crate::{ReportSnapshot, ScanOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadManifest { path: PathBuf },
    /// Operator feedback (sound, flash) for a processed scan.
    Feedback { outcome: ScanOutcome },
    ExportReport { snapshot: ReportSnapshot },
    /// Emitted once, on the scan that confirms the last expected unit.
    SessionCompleted,
}
