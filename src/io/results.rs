//! Results CSV: one named column of per-share prices, one row per valid iteration.
//!
//! This file is the hand-off between the simulation and any downstream
//! reporting, so the column name is fixed. Files written by the old scripts
//! (`Projected_Share_Price_INDF`) are still accepted on read.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::StringRecord;

use crate::error::AppError;
use crate::io::{StagedOutputs, write_atomically};

pub const RESULTS_COLUMN: &str = "projected_share_price";
pub const LEGACY_RESULTS_COLUMN: &str = "Projected_Share_Price_INDF";

/// Write prices to `path` (atomic; parent directories are created).
pub fn write_results_csv(path: &Path, prices: &[f64]) -> Result<(), AppError> {
    write_atomically(path, |out| write_prices(out, path, prices))
}

/// Add the results CSV to a batch of outputs committed together.
pub fn stage_results_csv(outputs: &mut StagedOutputs, path: &Path, prices: &[f64]) -> Result<(), AppError> {
    outputs.stage(path, |out| write_prices(out, path, prices))
}

fn write_prices<W: Write>(out: W, path: &Path, prices: &[f64]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record([RESULTS_COLUMN])
        .map_err(|e| AppError::io(format!("Failed to write results CSV header: {e}")))?;
    for price in prices {
        writer
            .write_record([price.to_string()])
            .map_err(|e| AppError::io(format!("Failed to write results CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to write results CSV '{}': {e}", path.display())))
}

/// Read prices back from a results CSV.
pub fn read_results_csv(path: &Path) -> Result<Vec<f64>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open results CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::io(format!("Failed to read results CSV headers '{}': {e}", path.display())))?
        .clone();
    let column = find_price_column(&headers).ok_or_else(|| {
        AppError::config(format!(
            "Results CSV '{}' has no `{RESULTS_COLUMN}` column.",
            path.display()
        ))
    })?;

    let mut prices = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // +2: header is line 1.
        let line = idx + 2;
        let record = record
            .map_err(|e| AppError::io(format!("{}: line {line}: CSV parse error: {e}", path.display())))?;
        let raw = record.get(column).unwrap_or("");
        let price: f64 = raw.parse().map_err(|_| {
            AppError::config(format!("{}: line {line}: invalid price `{raw}`", path.display()))
        })?;
        prices.push(price);
    }
    Ok(prices)
}

fn find_price_column(headers: &StringRecord) -> Option<usize> {
    headers.iter().position(|name| {
        // Spreadsheet exports sometimes prefix the first header with a BOM.
        let name = name.trim().trim_start_matches('\u{feff}');
        name.eq_ignore_ascii_case(RESULTS_COLUMN) || name.eq_ignore_ascii_case(LEGACY_RESULTS_COLUMN)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn written_prices_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/results.csv");
        let prices = [7_512.25, 9_001.5, 0.1 + 0.2];
        write_results_csv(&path, &prices).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("projected_share_price\n"));
        assert_eq!(read_results_csv(&path).unwrap(), prices);
    }

    #[test]
    fn legacy_column_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        std::fs::write(&path, "\u{feff}Projected_Share_Price_INDF\n7700.0\n8100\n").unwrap();
        assert_eq!(read_results_csv(&path).unwrap(), vec![7700.0, 8100.0]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_results_csv(Path::new("no/such/results.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("no/such/results.csv"));
    }

    #[test]
    fn bad_rows_report_line_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "projected_share_price\n1.0\nabc\n").unwrap();
        let err = read_results_csv(&path).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn wrong_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(&path, "price\n1.0\n").unwrap();
        assert_eq!(read_results_csv(&path).unwrap_err().kind(), ErrorKind::Config);
    }
}
