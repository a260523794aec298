//! Simple moving averages and price/average comparisons.
//!
//! SMA(n) = mean of the last n values, ending at the last observation.
//! With fewer than n values the average falls back to the last value
//! (the current price for closes), and any comparison that involves a
//! fallen-back average reads `true`.

use crate::domain::outcome::{FallbackReason, Outcome};

/// Trailing mean of the last `period` values.
///
/// Fallback sentinel is the last value (0.0 for an empty slice).
pub fn calculate_sma(values: &[f64], period: usize) -> Outcome<f64> {
    let last = values.last().copied().unwrap_or(0.0);
    if period == 0 || values.len() < period {
        return Outcome::Fallback(
            last,
            FallbackReason::InsufficientData {
                have: values.len(),
                need: period,
            },
        );
    }

    let window = &values[values.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;
    Outcome::finite_or(mean, last)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverages {
    pub current_price: f64,
    pub ma_short: Outcome<f64>,
    pub ma_long: Outcome<f64>,
    pub price_above_ma_short: bool,
    pub price_above_ma_long: bool,
    pub ma_short_above_ma_long: bool,
}

/// Each comparison falls back on its own: with `short <= len < long` bars the
/// price-vs-short check is still computed while the long-average checks read `true`.
pub fn calculate_moving_averages(closes: &[f64], short: usize, long: usize) -> MovingAverages {
    let current_price = closes.last().copied().unwrap_or(0.0);
    let ma_short = calculate_sma(closes, short);
    let ma_long = calculate_sma(closes, long);

    let short_ok = !ma_short.is_fallback();
    let long_ok = !ma_long.is_fallback();

    MovingAverages {
        current_price,
        price_above_ma_short: !short_ok || current_price > *ma_short.value(),
        price_above_ma_long: !long_ok || current_price > *ma_long.value(),
        ma_short_above_ma_long: !(short_ok && long_ok) || ma_short.value() > ma_long.value(),
        ma_short,
        ma_long,
    }
}
