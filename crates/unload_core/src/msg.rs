use std::path::PathBuf;

use crate::Manifest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A decoded string from the scanner (keyboard wedge, camera, or replay).
    ScanSubmitted(String),
    /// Operator asked to load a manifest file.
    LoadManifestRequested(PathBuf),
    /// Ingestion produced a validated manifest.
    ManifestLoaded { source: String, manifest: Manifest },
    /// Ingestion failed; the current session stays as it is.
    ManifestLoadFailed { source: String, error: String },
    /// Operator asked for the completion report.
    ExportRequested,
    /// Report collaborator finished writing.
    ExportFinished(Result<PathBuf, String>),
}
