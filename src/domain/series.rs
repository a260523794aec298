//! Validated per-instrument price series.

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    #[error("bars out of order at {date}")]
    Unordered { date: NaiveDate },

    #[error("duplicate bar for {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("missing or negative close/volume on {date}")]
    Malformed { date: NaiveDate },
}

/// Chronologically ascending bars for one instrument, no duplicate dates.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    code: String,
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(code: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self, SeriesError> {
        for bar in &bars {
            if !bar.is_well_formed() {
                return Err(SeriesError::Malformed { date: bar.date });
            }
        }
        for pair in bars.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(SeriesError::DuplicateDate { date: pair[1].date });
            }
            if pair[1].date < pair[0].date {
                return Err(SeriesError::Unordered { date: pair[1].date });
            }
        }
        Ok(Self {
            code: code.into(),
            bars,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(date: &str, close: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn accepts_ascending_bars() {
        let series = PriceSeries::new(
            "D05.SI",
            vec![
                make_bar("2025-06-02", 40.0),
                make_bar("2025-06-03", 40.5),
                make_bar("2025-06-05", 41.0),
            ],
        )
        .unwrap();

        assert_eq!(series.code(), "D05.SI");
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![40.0, 40.5, 41.0]);
        assert_eq!(series.volumes(), vec![1000.0; 3]);
        assert_eq!(
            series.first_date(),
            NaiveDate::from_ymd_opt(2025, 6, 2)
        );
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2025, 6, 5));
    }

    #[test]
    fn empty_series_is_valid() {
        let series = PriceSeries::new("O39.SI", vec![]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.last_date(), None);
    }

    #[test]
    fn rejects_duplicate_dates() {
        let result = PriceSeries::new(
            "D05.SI",
            vec![make_bar("2025-06-02", 40.0), make_bar("2025-06-02", 40.5)],
        );
        assert!(matches!(result, Err(SeriesError::DuplicateDate { .. })));
    }

    #[test]
    fn rejects_descending_dates() {
        let result = PriceSeries::new(
            "D05.SI",
            vec![make_bar("2025-06-03", 40.0), make_bar("2025-06-02", 40.5)],
        );
        assert!(matches!(result, Err(SeriesError::Unordered { .. })));
    }

    #[test]
    fn rejects_malformed_close() {
        let result = PriceSeries::new("D05.SI", vec![make_bar("2025-06-02", f64::NAN)]);
        assert!(matches!(result, Err(SeriesError::Malformed { .. })));
    }
}
