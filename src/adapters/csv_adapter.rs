//! CSV file data adapter: one `<CODE>.csv` per instrument.
//!
//! Files carry a `date,open,high,low,close,volume` header. The lookback
//! window is anchored at `as_of` when set, otherwise at the latest bar in
//! the file, so repeated runs over the same files see the same bars.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvBar {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

pub struct CsvAdapter {
    base_path: PathBuf,
    as_of: Option<NaiveDate>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            as_of: None,
        }
    }

    pub fn with_as_of(mut self, as_of: Option<NaiveDate>) -> Self {
        self.as_of = as_of;
        self
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }

    fn read_bars(&self, code: &str) -> Result<Vec<OhlcvBar>, ScreenerError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| ScreenerError::Data {
            code: code.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.deserialize::<CsvBar>() {
            let row = result.map_err(|e| ScreenerError::Data {
                code: code.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;
            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
                ScreenerError::Data {
                    code: code.to_string(),
                    reason: format!("invalid date {:?}: {}", row.date, e),
                }
            })?;
            bars.push(OhlcvBar {
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, code: &str, lookback_days: u32) -> Result<Vec<OhlcvBar>, ScreenerError> {
        let bars = self.read_bars(code)?;
        let end = match self.as_of.or_else(|| bars.last().map(|b| b.date)) {
            Some(end) => end,
            None => return Ok(bars),
        };
        // A window reaching past the earliest representable date keeps everything up to `end`.
        let start = Duration::try_days(i64::from(lookback_days))
            .and_then(|window| end.checked_sub_signed(window));

        Ok(bars
            .into_iter()
            .filter(|b| start.is_none_or(|start| b.date > start) && b.date <= end)
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScreenerError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| ScreenerError::Data {
            code: "*".to_string(),
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(code) = name_str.strip_suffix(".csv") {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
