//! Operator settings: RON file, then command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::LevelFilter;
use serde::Deserialize;
use unload_io::{ManifestColumns, ReportOptions};

use crate::Cli;

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
pub enum LogDestination {
    /// Write to `unload.log` in the output directory.
    #[default]
    File,
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    /// Report file stem; defaults to the manifest file stem.
    pub report_stem: Option<String>,
    pub log: LogDestination,
    pub log_level: String,
    pub bell_on_reject: bool,
    pub export_on_complete: bool,
    pub columns: ManifestColumns,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            report_stem: None,
            log: LogDestination::File,
            log_level: "info".to_string(),
            bell_on_reject: true,
            export_on_complete: false,
            columns: ManifestColumns::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config file when one is given; a missing file is an error
    /// only because the operator asked for it explicitly.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(log) = cli.log {
            self.log = log;
        }
        if cli.verbose {
            self.log_level = "debug".to_string();
        }
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.log_level
            .parse()
            .with_context(|| format!("unknown log level '{}'", self.log_level))
    }

    /// Report options for a manifest loaded from `source`.
    pub fn report_options(&self, source: Option<&str>) -> ReportOptions {
        let stem = self
            .report_stem
            .clone()
            .or_else(|| {
                source
                    .map(Path::new)
                    .and_then(Path::file_stem)
                    .map(|s| s.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "unload".to_string());
        ReportOptions::new(self.output_dir.clone(), stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = AppConfig::from_ron("(bell_on_reject: false, log: Both)").unwrap();
        assert!(!config.bell_on_reject);
        assert_eq!(config.log, LogDestination::Both);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.columns, ManifestColumns::default());
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn column_names_can_be_overridden() {
        let config = AppConfig::from_ron(
            r#"(report_stem: Some("truck"), columns: (code: "sku", quantity: "qty"))"#,
        )
        .unwrap();
        assert_eq!(config.columns.code, "sku");
        assert_eq!(config.columns.destination, "ciudad");
        assert_eq!(config.report_options(Some("in/m.csv")).stem, "truck");
    }

    #[test]
    fn report_stem_falls_back_to_manifest_name() {
        let config = AppConfig::default();
        assert_eq!(config.report_options(Some("in/camion 4.csv")).stem, "camion 4");
        assert_eq!(config.report_options(None).stem, "unload");
    }

    #[test]
    fn invalid_level_and_file_are_errors() {
        let config = AppConfig {
            log_level: "loud".into(),
            ..AppConfig::default()
        };
        assert!(config.level_filter().is_err());

        let dir = tempfile::TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.ron"))).is_err());
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }
}
