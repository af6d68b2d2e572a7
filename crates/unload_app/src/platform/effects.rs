use std::io::Write;

use chrono::Utc;
use unload_core::{Effect, Msg, ScanOutcome};
use unload_io::{export_report, load_manifest_file};
use unload_logging::{unload_debug, unload_error, unload_info};

use super::config::AppConfig;
use super::ui::constants::BELL;

/// Runs effects synchronously and turns their results back into messages.
pub struct EffectRunner {
    config: AppConfig,
    /// Source of the manifest most recently handed to the core; names the report.
    manifest_source: Option<String>,
    generated_utc: fn() -> String,
}

impl EffectRunner {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            manifest_source: None,
            generated_utc: || Utc::now().to_rfc3339(),
        }
    }

    #[cfg(test)]
    fn with_clock(mut self, generated_utc: fn() -> String) -> Self {
        self.generated_utc = generated_utc;
        self
    }

    /// Executes `effects`; operator feedback goes to `term`.
    pub fn run(&mut self, effects: Vec<Effect>, term: &mut dyn Write) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::LoadManifest { path } => {
                    let source = path.display().to_string();
                    unload_info!("loading manifest {}", source);
                    let msg = match load_manifest_file(&path, &self.config.columns) {
                        Ok(manifest) => {
                            self.manifest_source = Some(source.clone());
                            Msg::ManifestLoaded { source, manifest }
                        }
                        Err(err) => Msg::ManifestLoadFailed {
                            source,
                            error: err.to_string(),
                        },
                    };
                    follow_up.push(msg);
                }
                Effect::Feedback { outcome } => self.feedback(&outcome, term),
                Effect::ExportReport { snapshot } => {
                    let options = self.config.report_options(self.manifest_source.as_deref());
                    let result = export_report(&snapshot, &(self.generated_utc)(), &options)
                        .map(|summary| summary.csv_path)
                        .map_err(|err| {
                            unload_error!("export failed: {}", err);
                            err.to_string()
                        });
                    follow_up.push(Msg::ExportFinished(result));
                }
                Effect::SessionCompleted => {
                    if self.config.export_on_complete {
                        follow_up.push(Msg::ExportRequested);
                    }
                }
            }
        }
        follow_up
    }

    fn feedback(&self, outcome: &ScanOutcome, term: &mut dyn Write) {
        if let Some(reason) = outcome.reject_reason() {
            unload_debug!("feedback: rejected ({:?})", reason);
            if self.config.bell_on_reject {
                let _ = term.write_all(BELL.as_bytes());
                let _ = term.flush();
            }
        }
    }
}
