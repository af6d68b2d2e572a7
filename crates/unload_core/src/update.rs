use unload_logging::{unload_info, unload_warn};

use crate::aggregate::report_snapshot;
use crate::reconcile::{apply_scan, RejectReason, ScanOutcome};
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ScanSubmitted(raw) => {
            let raw = raw.trim().to_owned();
            if raw.is_empty() {
                return (state, Vec::new());
            }

            let outcome = match state.take_session() {
                Some(session) => {
                    let (outcome, session) = apply_scan(session, &raw);
                    state.restore_session(session);
                    outcome
                }
                None => ScanOutcome::Rejected {
                    reason: RejectReason::NoManifestLoaded,
                    primary_code: None,
                },
            };

            state.record_scan(raw, outcome.clone());
            let completed = outcome.is_accepted() && state.announce_completion();
            let mut effects = Vec::with_capacity(1 + usize::from(completed));
            effects.push(Effect::Feedback { outcome });
            if completed {
                unload_info!("all expected units confirmed");
                effects.push(Effect::SessionCompleted);
            }
            effects
        }
        Msg::LoadManifestRequested(path) => vec![Effect::LoadManifest { path }],
        Msg::ManifestLoaded { source, manifest } => {
            unload_info!(
                "manifest {} loaded: {} lines, {} units",
                source,
                manifest.len(),
                manifest.total_expected()
            );
            state.replace_manifest(source, manifest);
            Vec::new()
        }
        Msg::ManifestLoadFailed { source, error } => {
            unload_warn!("manifest {} rejected: {}", source, error);
            state.record_error(format!("could not load {source}: {error}"));
            Vec::new()
        }
        Msg::ExportRequested => match state.session() {
            Some(session) => vec![Effect::ExportReport {
                snapshot: report_snapshot(session),
            }],
            None => {
                state.record_error("no manifest loaded; nothing to export".to_owned());
                Vec::new()
            }
        },
        Msg::ExportFinished(Ok(path)) => {
            state.record_export(path);
            Vec::new()
        }
        Msg::ExportFinished(Err(error)) => {
            state.record_error(format!("export failed: {error}"));
            Vec::new()
        }
    };

    (state, effects)
}
