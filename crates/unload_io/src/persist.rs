use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {path} is not usable: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Create the output directory (and parents) if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    fs::create_dir_all(dir).map_err(|e| unusable(e.to_string()))?;
    if !dir.is_dir() {
        return Err(unusable("path is not a directory".to_string()));
    }
    Ok(())
}

/// The files of one report export, staged as hidden temp files in the output
/// directory and renamed into place together by [`ReportBundle::publish`].
///
/// Dropping an unpublished bundle removes whatever was staged, so a failed
/// export never leaves a CSV without its summary.
pub struct ReportBundle {
    dir: PathBuf,
    staged: Vec<(PathBuf, NamedTempFile)>,
}

impl ReportBundle {
    pub fn new(dir: PathBuf) -> Result<Self, PersistError> {
        ensure_output_dir(&dir)?;
        Ok(Self {
            dir,
            staged: Vec::new(),
        })
    }

    /// Writes `content` to a temp file and returns the path it will be
    /// published under.
    pub fn stage(&mut self, file_name: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.as_file_mut().sync_all()?;

        let target = self.dir.join(file_name);
        self.staged.push((target.clone(), tmp));
        Ok(target)
    }

    /// Renames every staged file over its target, in staging order.
    pub fn publish(self) -> Result<Vec<PathBuf>, PersistError> {
        let mut published = Vec::with_capacity(self.staged.len());
        for (target, tmp) in self.staged {
            tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
            published.push(target);
        }
        Ok(published)
    }
}
