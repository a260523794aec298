//! Daily OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// Close and volume are present, finite and non-negative.
    ///
    /// Open/high/low are carried for completeness but no indicator reads them,
    /// so they are not checked here.
    pub fn is_well_formed(&self) -> bool {
        self.close.is_finite() && self.close >= 0.0 && self.volume.is_finite() && self.volume >= 0.0
    }
}
