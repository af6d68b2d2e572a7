use std::fmt;

use unload_logging::{unload_debug, unload_info};

use crate::resolve::{resolve, ResolutionError};
use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    NoManifestLoaded,
    UnknownCode,
    QuotaExceeded,
    AlreadyFullyScannedWithoutSuffix,
    DuplicateSuffix,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoManifestLoaded => write!(f, "no manifest loaded"),
            RejectReason::UnknownCode => write!(f, "code does not match any product"),
            RejectReason::QuotaExceeded => {
                write!(f, "all units of this product have already been scanned")
            }
            RejectReason::AlreadyFullyScannedWithoutSuffix => {
                write!(f, "units without suffix already scanned; scan the unit suffix")
            }
            RejectReason::DuplicateSuffix => write!(f, "this unit has already been scanned"),
        }
    }
}

impl From<ResolutionError> for RejectReason {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::UnknownCode => RejectReason::UnknownCode,
        }
    }
}

/// Result of applying one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Accepted {
        primary_code: String,
        /// `None` when the unit was counted without a suffix.
        suffix: Option<String>,
        scanned_total: u32,
        expected_quantity: u32,
    },
    Rejected {
        reason: RejectReason,
        /// Line the scan resolved to, when it resolved at all.
        primary_code: Option<String>,
    },
}

impl ScanOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ScanOutcome::Accepted { .. })
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            ScanOutcome::Accepted { .. } => None,
            ScanOutcome::Rejected { reason, .. } => Some(*reason),
        }
    }

    pub fn primary_code(&self) -> Option<&str> {
        match self {
            ScanOutcome::Accepted { primary_code, .. } => Some(primary_code),
            ScanOutcome::Rejected { primary_code, .. } => primary_code.as_deref(),
        }
    }

    pub(crate) fn rejected(reason: RejectReason, primary_code: Option<String>) -> Self {
        ScanOutcome::Rejected {
            reason,
            primary_code,
        }
    }
}

/// How an accepted scan is recorded on its line.
enum Confirmation {
    Unsuffixed,
    Suffix(String),
}

/// Applies a raw scan to the session.
///
/// The whole decision is taken against an unmodified state; mutation only
/// happens once the scan is known to be accepted, so a rejected scan leaves
/// `state` exactly as it was.
pub fn apply_scan(mut state: SessionState, raw: &str) -> (ScanOutcome, SessionState) {
    let (primary_code, expected, confirmation) = match decide(&state, raw) {
        Ok(decision) => decision,
        Err(outcome) => {
            unload_debug!("scan {:?} rejected: {:?}", raw, outcome.reject_reason());
            return (outcome, state);
        }
    };

    let lp = state.progress.entry(primary_code.clone()).or_default();
    let suffix = match confirmation {
        Confirmation::Unsuffixed => {
            lp.unsuffixed_count += 1;
            None
        }
        Confirmation::Suffix(suffix) => {
            lp.confirmed_suffixes.insert(suffix.clone());
            Some(suffix)
        }
    };
    let scanned_total = lp.scanned_total();
    state.global_scanned += 1;
    state.most_recent = Some(primary_code.clone());

    unload_info!(
        "accepted {} suffix={:?} ({}/{}) global {}/{}",
        primary_code,
        suffix,
        scanned_total,
        expected,
        state.global_scanned,
        state.global_expected()
    );

    let outcome = ScanOutcome::Accepted {
        primary_code,
        suffix,
        scanned_total,
        expected_quantity: expected,
    };
    (outcome, state)
}

fn decide(state: &SessionState, raw: &str) -> Result<(String, u32, Confirmation), ScanOutcome> {
    let resolved = resolve(raw, state.manifest())
        .map_err(|err| ScanOutcome::rejected(err.into(), None))?;
    let line = resolved.line;
    let expected = line.expected_quantity();
    let primary_code = line.primary_code().to_owned();
    let lp = state.line_progress(line);

    if lp.scanned_total() >= expected {
        return Err(ScanOutcome::rejected(
            RejectReason::QuotaExceeded,
            Some(primary_code),
        ));
    }

    if !resolved.has_suffix() || expected == 1 {
        if lp.unsuffixed_count() < expected {
            return Ok((primary_code, expected, Confirmation::Unsuffixed));
        }
        return Err(ScanOutcome::rejected(
            RejectReason::AlreadyFullyScannedWithoutSuffix,
            Some(primary_code),
        ));
    }

    if lp.confirmed_suffixes().contains(&resolved.suffix) {
        return Err(ScanOutcome::rejected(
            RejectReason::DuplicateSuffix,
            Some(primary_code),
        ));
    }
    Ok((primary_code, expected, Confirmation::Suffix(resolved.suffix)))
}
