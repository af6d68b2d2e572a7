use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use unload_core::{Manifest, ManifestError, ManifestLine};
use unload_logging::unload_info;

use crate::decode::{decode_manifest_bytes, DecodeError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },
    #[error("line {line}: missing value for '{column}'")]
    MissingField { line: u64, column: String },
    #[error("line {line}: invalid quantity '{value}'")]
    InvalidQuantity { line: u64, value: String },
    #[error("invalid manifest: {0}")]
    Manifest(#[from] ManifestError),
}

/// Header names of the manifest columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ManifestColumns {
    pub code: String,
    pub quantity: String,
    pub destination: String,
    /// Optional column of comma-separated alternative codes.
    pub aliases: String,
}

impl Default for ManifestColumns {
    fn default() -> Self {
        Self {
            code: "codigo_barra".to_string(),
            quantity: "cantidad".to_string(),
            destination: "ciudad".to_string(),
            aliases: "codigos_adicionales".to_string(),
        }
    }
}

struct ColumnIndex {
    code: usize,
    quantity: usize,
    destination: usize,
    aliases: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord, columns: &ManifestColumns) -> Result<Self, IngestError> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require = |name: &str| {
            find(name).ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
            })
        };
        Ok(Self {
            code: require(&columns.code)?,
            quantity: require(&columns.quantity)?,
            destination: require(&columns.destination)?,
            aliases: find(&columns.aliases),
        })
    }
}

/// Parse manifest CSV text into a validated [`Manifest`].
///
/// Rows whose fields are all blank are skipped. Every field is trimmed.
pub fn parse_manifest_csv(text: &str, columns: &ManifestColumns) -> Result<Manifest, IngestError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let index = ColumnIndex::from_headers(reader.headers()?, columns)?;

    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line_no = record.position().map(|p| p.line()).unwrap_or_default();
        let code = required(&record, index.code, line_no, &columns.code)?;
        let raw_quantity = required(&record, index.quantity, line_no, &columns.quantity)?;
        let quantity = match raw_quantity.parse::<u32>() {
            Ok(q) if q > 0 => q,
            _ => {
                return Err(IngestError::InvalidQuantity {
                    line: line_no,
                    value: raw_quantity.to_string(),
                })
            }
        };
        let aliases = index
            .aliases
            .map(|idx| parse_aliases(record.get(idx).unwrap_or("")))
            .unwrap_or_default();

        let destination = record.get(index.destination).unwrap_or("");
        lines.push(ManifestLine::new(code, quantity, destination).with_aliases(aliases));
    }

    Ok(Manifest::new(lines)?)
}

fn required<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    line: u64,
    column: &str,
) -> Result<&'r str, IngestError> {
    match record.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(IngestError::MissingField {
            line,
            column: column.to_string(),
        }),
    }
}

fn parse_aliases(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Read, decode, and parse a manifest file.
pub fn load_manifest_file(path: &Path, columns: &ManifestColumns) -> Result<Manifest, IngestError> {
    let bytes = fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = decode_manifest_bytes(&bytes)?;
    let manifest = parse_manifest_csv(&decoded.text, columns)?;
    unload_info!(
        "read manifest {:?}: {} lines, {} units, encoding {}",
        path,
        manifest.len(),
        manifest.total_expected(),
        decoded.encoding_label
    );
    Ok(manifest)
}
