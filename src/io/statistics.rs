//! Statistics record (JSON): every `SummaryStatistics` field plus run metadata.

use std::fs::File;
use std::path::Path;

use crate::domain::StatisticsFile;
use crate::error::AppError;
use crate::io::{StagedOutputs, write_atomically};

pub const TOOL_NAME: &str = "sotp";

/// Write the statistics record as pretty JSON.
pub fn write_statistics_json(path: &Path, record: &StatisticsFile) -> Result<(), AppError> {
    write_atomically(path, |out| {
        serde_json::to_writer_pretty(&mut *out, record)
            .map_err(|e| AppError::io(format!("Failed to write statistics JSON '{}': {e}", path.display())))
    })
}

/// Add the statistics record to a batch of outputs committed together.
pub fn stage_statistics_json(
    outputs: &mut StagedOutputs,
    path: &Path,
    record: &StatisticsFile,
) -> Result<(), AppError> {
    outputs.stage(path, |out| {
        serde_json::to_writer_pretty(&mut *out, record)
            .map_err(|e| AppError::io(format!("Failed to write statistics JSON '{}': {e}", path.display())))
    })
}

/// Read a statistics record back.
pub fn read_statistics_json(path: &Path) -> Result<StatisticsFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open statistics JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::config(format!("Invalid statistics JSON '{}': {e}", path.display())))
}
