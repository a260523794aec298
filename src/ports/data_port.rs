//! Price data port trait.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::OhlcvBar;

/// Source of daily bars. Implementations own timeouts and rate limits.
///
/// `Send + Sync` because the pipeline fetches from a worker pool.
pub trait DataPort: Send + Sync {
    /// Bars covering the last `lookback_days` calendar days, oldest first.
    /// An empty vector is a valid answer.
    fn fetch_series(&self, code: &str, lookback_days: u32) -> Result<Vec<OhlcvBar>, ScreenerError>;

    fn list_symbols(&self) -> Result<Vec<String>, ScreenerError>;
}
