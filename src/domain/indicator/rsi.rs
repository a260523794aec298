//! RSI (Relative Strength Index) at the last observation.
//!
//! Gains and losses are the positive and negative parts of the close-to-close
//! changes over the trailing `period` steps. Both are averaged with a simple
//! mean (not Wilder's recursive smoothing), so only the final `period + 1`
//! closes affect the result.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! - avg_loss == 0 and avg_gain > 0: RSI saturates at 100
//! - avg_loss == 0 and avg_gain == 0 (flat window): neutral 50, `UndefinedRatio`
//! - fewer than `period + 1` closes: neutral 50, `InsufficientData`

use crate::domain::outcome::{FallbackReason, Outcome};

pub const NEUTRAL_RSI: f64 = 50.0;

pub fn calculate_rsi(closes: &[f64], period: usize) -> Outcome<f64> {
    let need = period + 1;
    if period == 0 || closes.len() < need {
        return Outcome::Fallback(
            NEUTRAL_RSI,
            FallbackReason::InsufficientData {
                have: closes.len(),
                need,
            },
        );
    }

    let window = &closes[closes.len() - need..];
    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains += change;
        } else if change < 0.0 {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if !avg_gain.is_finite() || !avg_loss.is_finite() {
        return Outcome::Fallback(NEUTRAL_RSI, FallbackReason::NonFinite);
    }

    if avg_loss == 0.0 {
        return if avg_gain == 0.0 {
            Outcome::Fallback(NEUTRAL_RSI, FallbackReason::UndefinedRatio)
        } else {
            Outcome::Computed(100.0)
        };
    }

    let rsi = 100.0 - (100.0 / (1.0 + avg_gain / avg_loss));
    Outcome::finite_or(rsi.clamp(0.0, 100.0), NEUTRAL_RSI)
}
