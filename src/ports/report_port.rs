//! Report output port trait.

use crate::domain::error::ScreenerError;
use crate::domain::projection::ReportRow;
use std::path::Path;

/// Port for writing the tabular screening report.
pub trait ReportPort {
    fn write(&self, rows: &[ReportRow], output_path: &Path) -> Result<(), ScreenerError>;
}
