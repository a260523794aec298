//! CSV report adapter implementing ReportPort.

use crate::domain::error::ScreenerError;
use crate::domain::projection::ReportRow;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub const REPORT_COLUMNS: [&str; 12] = [
    "Company",
    "Symbol",
    "Price",
    "Score",
    "RSI",
    "5D Momentum (%)",
    "20D Momentum (%)",
    "50D Momentum (%)",
    "Above MA20",
    "Above MA50",
    "Volume Ratio",
    "Volatility (%)",
];

pub struct CsvReportAdapter;

fn report_error(output_path: &Path, e: impl std::fmt::Display) -> ScreenerError {
    ScreenerError::Report {
        reason: format!("{}: {}", output_path.display(), e),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, rows: &[ReportRow], output_path: &Path) -> Result<(), ScreenerError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| report_error(output_path, e))?;

        // serialize() emits the header with the first row only
        if rows.is_empty() {
            wtr.write_record(REPORT_COLUMNS)
                .map_err(|e| report_error(output_path, e))?;
        }
        for row in rows {
            wtr.serialize(row).map_err(|e| report_error(output_path, e))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
