//! Unload I/O: manifest ingestion and completion report export.
mod decode;
mod filename;
mod ingest;
mod persist;
mod report;

pub use decode::{decode_manifest_bytes, DecodeError, DecodedText};
pub use filename::report_basename;
pub use ingest::{load_manifest_file, parse_manifest_csv, IngestError, ManifestColumns};
pub use persist::{ensure_output_dir, PersistError, ReportBundle};
pub use report::{
    export_report, render_report_csv, ExportError, ExportSummary, ReportOptions,
    SUFFIX_LIST_SEPARATOR,
};
