use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

/// Separator between the base code and the unit suffix in a scanned string.
pub const SUFFIX_SEPARATOR: char = '-';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("manifest has no lines")]
    Empty,
    #[error("line {line} has an empty code")]
    EmptyCode { line: usize },
    #[error("code {code} has an expected quantity of zero")]
    ZeroQuantity { code: String },
    #[error("code {code} appears more than once")]
    DuplicateCode { code: String },
    #[error("code {alias} is claimed by both {first} and {second}")]
    AliasCollision {
        alias: String,
        first: String,
        second: String,
    },
    #[error("code {code} contains the reserved suffix separator '-'")]
    ReservedSeparator { code: String },
}

/// One expected product line of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLine {
    primary_code: String,
    alias_codes: BTreeSet<String>,
    expected_quantity: u32,
    destination: String,
}

impl ManifestLine {
    /// The alias set always contains the primary code itself.
    pub fn new(
        primary_code: impl Into<String>,
        expected_quantity: u32,
        destination: impl Into<String>,
    ) -> Self {
        let primary_code = primary_code.into();
        let mut alias_codes = BTreeSet::new();
        alias_codes.insert(primary_code.clone());
        Self {
            primary_code,
            alias_codes,
            expected_quantity,
            destination: destination.into(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alias_codes.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn primary_code(&self) -> &str {
        &self.primary_code
    }

    pub fn alias_codes(&self) -> &BTreeSet<String> {
        &self.alias_codes
    }

    pub fn expected_quantity(&self) -> u32 {
        self.expected_quantity
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn accepts(&self, code: &str) -> bool {
        self.alias_codes.contains(code)
    }
}

/// Ordered, validated set of manifest lines.
///
/// Codes are indexed at construction, so lookups never depend on scanning
/// order and a code can only ever resolve to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    lines: Vec<ManifestLine>,
    index: BTreeMap<String, usize>,
}

impl Manifest {
    pub fn new(lines: Vec<ManifestLine>) -> Result<Self, ManifestError> {
        if lines.is_empty() {
            return Err(ManifestError::Empty);
        }

        let mut primaries = BTreeSet::new();
        let mut index: BTreeMap<String, usize> = BTreeMap::new();
        for (pos, line) in lines.iter().enumerate() {
            if line.expected_quantity == 0 {
                return Err(ManifestError::ZeroQuantity {
                    code: line.primary_code.clone(),
                });
            }
            if !primaries.insert(line.primary_code.as_str()) {
                return Err(ManifestError::DuplicateCode {
                    code: line.primary_code.clone(),
                });
            }
            for code in &line.alias_codes {
                if code.trim().is_empty() {
                    return Err(ManifestError::EmptyCode { line: pos + 1 });
                }
                if code.contains(SUFFIX_SEPARATOR) {
                    return Err(ManifestError::ReservedSeparator { code: code.clone() });
                }
                if let Some(&other) = index.get(code) {
                    return Err(ManifestError::AliasCollision {
                        alias: code.clone(),
                        first: lines[other].primary_code.clone(),
                        second: line.primary_code.clone(),
                    });
                }
                index.insert(code.clone(), pos);
            }
        }

        Ok(Self { lines, index })
    }

    pub fn lines(&self) -> &[ManifestLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Finds the line whose primary or alias codes contain `code` exactly.
    pub fn find(&self, code: &str) -> Option<&ManifestLine> {
        self.index.get(code).map(|&pos| &self.lines[pos])
    }

    pub fn get(&self, primary_code: &str) -> Option<&ManifestLine> {
        self.find(primary_code)
            .filter(|line| line.primary_code == primary_code)
    }

    pub fn total_expected(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.expected_quantity))
            .sum()
    }
}
