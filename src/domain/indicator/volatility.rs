//! Annualized volatility of close-to-close returns.
//!
//! VOL = stddev(r) * sqrt(trading_days) * 100, where r[i] = C[i] / C[i-1] - 1
//! over the whole series and stddev is the sample deviation (n - 1).
//! Needs at least two returns (three closes); otherwise 0.0.

use crate::domain::outcome::{FallbackReason, Outcome};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

pub fn calculate_volatility(closes: &[f64], trading_days: f64) -> Outcome<f64> {
    if closes.len() < 3 {
        return Outcome::Fallback(
            0.0,
            FallbackReason::InsufficientData {
                have: closes.len(),
                need: 3,
            },
        );
    }

    let mut returns = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        if pair[0] == 0.0 {
            return Outcome::Fallback(0.0, FallbackReason::UndefinedRatio);
        }
        returns.push(pair[1] / pair[0] - 1.0);
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns
        .iter()
        .map(|r| {
            let diff = r - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);

    Outcome::finite_or(variance.sqrt() * trading_days.sqrt() * 100.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn constant_prices_have_zero_volatility() {
        let closes = vec![100.0; 30];
        assert_eq!(
            calculate_volatility(&closes, TRADING_DAYS_PER_YEAR),
            Outcome::Computed(0.0)
        );
    }

    #[test]
    fn known_values() {
        // Returns: +10%, -10%. Mean 0, sample variance = (0.01 + 0.01) / 1 = 0.02.
        let closes = [100.0, 110.0, 99.0];
        let vol = calculate_volatility(&closes, TRADING_DAYS_PER_YEAR);
        let expected = 0.02_f64.sqrt() * 252.0_f64.sqrt() * 100.0;
        assert_relative_eq!(*vol.value(), expected, epsilon = 1e-9);
    }

    #[test]
    fn too_few_closes() {
        assert_eq!(
            calculate_volatility(&[100.0, 101.0], TRADING_DAYS_PER_YEAR),
            Outcome::Fallback(0.0, FallbackReason::InsufficientData { have: 2, need: 3 })
        );
    }

    #[test]
    fn zero_close_is_undefined() {
        assert_eq!(
            calculate_volatility(&[100.0, 0.0, 50.0], TRADING_DAYS_PER_YEAR),
            Outcome::Fallback(0.0, FallbackReason::UndefinedRatio)
        );
    }

    #[test]
    fn scales_with_trading_days() {
        let closes = [100.0, 102.0, 101.0, 103.0];
        let daily = *calculate_volatility(&closes, 1.0).value();
        let annual = *calculate_volatility(&closes, 252.0).value();
        assert_relative_eq!(annual, daily * 252.0_f64.sqrt(), epsilon = 1e-9);
    }
}
