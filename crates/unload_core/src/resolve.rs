use thiserror::Error;

use crate::manifest::{Manifest, ManifestLine, SUFFIX_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("scanned code does not match any manifest line")]
    UnknownCode,
}

/// A scan matched to its manifest line. `suffix` is empty when the scan
/// carried no unit suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScan<'a> {
    pub line: &'a ManifestLine,
    pub suffix: String,
}

impl ResolvedScan<'_> {
    pub fn has_suffix(&self) -> bool {
        !self.suffix.is_empty()
    }
}

/// Splits a raw scan on its first separator into `(code, suffix)`.
///
/// Both halves are trimmed; the suffix is empty when no separator is present.
pub fn split_scan(raw: &str) -> (&str, &str) {
    let raw = raw.trim();
    match raw.split_once(SUFFIX_SEPARATOR) {
        Some((code, suffix)) => (code.trim(), suffix.trim()),
        None => (raw, ""),
    }
}

/// Maps a raw scanned string to its manifest line.
pub fn resolve<'a>(raw: &str, manifest: &'a Manifest) -> Result<ResolvedScan<'a>, ResolutionError> {
    let (code, suffix) = split_scan(raw);
    if code.is_empty() {
        return Err(ResolutionError::UnknownCode);
    }
    let line = manifest.find(code).ok_or(ResolutionError::UnknownCode)?;
    Ok(ResolvedScan {
        line,
        suffix: suffix.to_owned(),
    })
}
