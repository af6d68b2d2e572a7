use std::collections::{BTreeMap, BTreeSet};

use crate::manifest::{Manifest, ManifestLine};

/// Confirmed units for one manifest line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineProgress {
    pub(crate) unsuffixed_count: u32,
    pub(crate) confirmed_suffixes: BTreeSet<String>,
}

impl LineProgress {
    pub fn unsuffixed_count(&self) -> u32 {
        self.unsuffixed_count
    }

    pub fn confirmed_suffixes(&self) -> &BTreeSet<String> {
        &self.confirmed_suffixes
    }

    pub fn scanned_total(&self) -> u32 {
        // Suffix count is bounded by the line quantity.
        self.unsuffixed_count + self.confirmed_suffixes.len() as u32
    }
}

static NO_PROGRESS: LineProgress = LineProgress {
    unsuffixed_count: 0,
    confirmed_suffixes: BTreeSet::new(),
};

/// Reconciliation state for one loaded manifest.
///
/// Built fresh from a manifest and replaced wholesale on reload; only
/// [`crate::apply_scan`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    manifest: Manifest,
    pub(crate) progress: BTreeMap<String, LineProgress>,
    pub(crate) global_scanned: u64,
    global_expected: u64,
    pub(crate) most_recent: Option<String>,
}

impl SessionState {
    pub fn new(manifest: Manifest) -> Self {
        let progress = manifest
            .lines()
            .iter()
            .map(|line| (line.primary_code().to_owned(), LineProgress::default()))
            .collect();
        let global_expected = manifest.total_expected();
        Self {
            manifest,
            progress,
            global_scanned: 0,
            global_expected,
            most_recent: None,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn progress(&self, primary_code: &str) -> Option<&LineProgress> {
        self.progress.get(primary_code)
    }

    /// Progress for a line of this session's manifest; zero for a foreign line.
    pub fn line_progress(&self, line: &ManifestLine) -> &LineProgress {
        self.progress.get(line.primary_code()).unwrap_or(&NO_PROGRESS)
    }

    pub fn global_scanned(&self) -> u64 {
        self.global_scanned
    }

    pub fn global_expected(&self) -> u64 {
        self.global_expected
    }

    /// Primary code of the line that accepted the latest scan.
    pub fn most_recent(&self) -> Option<&str> {
        self.most_recent.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.global_scanned == self.global_expected
    }

    /// Sum of per-line totals, recomputed from scratch.
    pub fn recomputed_scanned(&self) -> u64 {
        self.progress
            .values()
            .map(|lp| u64::from(lp.scanned_total()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_progress_borrows_stored_progress() {
        let manifest = Manifest::new(vec![ManifestLine::new("A1", 3, "Lima")]).unwrap();
        let mut state = SessionState::new(manifest);
        state
            .progress
            .get_mut("A1")
            .unwrap()
            .confirmed_suffixes
            .insert("2".to_owned());

        let line = state.manifest().lines()[0].clone();
        let stored = state.progress("A1").unwrap();
        assert!(std::ptr::eq(state.line_progress(&line), stored));
        assert_eq!(state.line_progress(&line).scanned_total(), 1);

        let foreign = ManifestLine::new("Z9", 1, "Puno");
        assert_eq!(state.line_progress(&foreign), &LineProgress::default());
    }
}
