//! Input/output helpers.
//!
//! - results CSV read/write (`results`)
//! - statistics JSON write (`statistics`)
//!
//! Every writer goes through [`StagedOutputs`]: output lands in a temporary
//! sibling file and is renamed into place only after every file of the batch
//! was fully written, so a failed run never leaves a truncated or partial set
//! of artifacts behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub mod results;
pub mod statistics;

pub use results::*;
pub use statistics::*;

/// Write `path` via a temporary sibling, creating parent directories as needed.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<(), AppError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), AppError>,
{
    let mut outputs = StagedOutputs::new();
    outputs.stage(path, write)?;
    outputs.commit()
}

#[derive(Debug)]
struct StagedFile {
    tmp: PathBuf,
    target: PathBuf,
}

/// A batch of output files written to `.tmp` siblings and committed together.
///
/// Dropping the batch without calling [`StagedOutputs::commit`] removes every
/// staged temp file.
#[derive(Debug, Default)]
pub struct StagedOutputs {
    staged: Vec<StagedFile>,
}

impl StagedOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `path` by writing its contents through a buffered writer.
    pub fn stage<F>(&mut self, path: &Path, write: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<(), AppError>,
    {
        self.stage_with(path, |tmp| {
            let file = File::create(tmp)
                .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", tmp.display())))?;
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer
                .flush()
                .map_err(|e| AppError::io(format!("Failed to flush '{}': {e}", tmp.display())))
        })
    }

    /// Stage `path` with a renderer that writes the temp file itself.
    pub fn stage_with<F>(&mut self, path: &Path, render: F) -> Result<(), AppError>
    where
        F: FnOnce(&Path) -> Result<(), AppError>,
    {
        let tmp = temp_path(path)?;
        if let Err(e) = render(&tmp) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        self.staged.push(StagedFile {
            tmp,
            target: path.to_path_buf(),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Rename every staged file into place.
    ///
    /// If any rename fails, files already moved by this call are removed and
    /// the remaining temp files are deleted.
    pub fn commit(mut self) -> Result<(), AppError> {
        let staged = std::mem::take(&mut self.staged);
        let mut committed: Vec<PathBuf> = Vec::with_capacity(staged.len());
        let mut pending = staged.into_iter();

        while let Some(file) = pending.next() {
            if let Err(e) = fs::rename(&file.tmp, &file.target) {
                let _ = fs::remove_file(&file.tmp);
                for rest in pending.by_ref() {
                    let _ = fs::remove_file(&rest.tmp);
                }
                for target in &committed {
                    let _ = fs::remove_file(target);
                }
                return Err(AppError::io(format!(
                    "Failed to move output into '{}': {e}",
                    file.target.display()
                )));
            }
            committed.push(file.target);
        }
        Ok(())
    }
}

impl Drop for StagedOutputs {
    fn drop(&mut self) {
        for file in &self.staged {
            let _ = fs::remove_file(&file.tmp);
        }
    }
}

/// Create the parent directory of `path` and return a temp path next to it.
fn temp_path(path: &Path) -> Result<PathBuf, AppError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| AppError::io(format!("Failed to create directory '{}': {e}", dir.display())))?;
    }
    let mut name = path
        .file_name()
        .ok_or_else(|| AppError::io(format!("Output path '{}' has no file name.", path.display())))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}
