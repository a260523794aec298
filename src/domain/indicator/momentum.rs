//! Price momentum (rate of change) at the last observation.
//!
//! MOM(n) = ((C[last] / C[last - n]) - 1) * 100
//! The reference close sits n observations before the last one, i.e. index
//! `len - 1 - n`. Requires n + 1 closes; otherwise 0.0 (`InsufficientData`).
//! A zero reference close yields 0.0 (`UndefinedRatio`).

use crate::domain::outcome::{FallbackReason, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MomentumWindows {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

impl Default for MomentumWindows {
    fn default() -> Self {
        Self {
            short: 5,
            medium: 20,
            long: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Momentum {
    pub short: Outcome<f64>,
    pub medium: Outcome<f64>,
    pub long: Outcome<f64>,
}

pub fn calculate_momentum(closes: &[f64], period: usize) -> Outcome<f64> {
    let need = period + 1;
    if closes.len() < need {
        return Outcome::Fallback(
            0.0,
            FallbackReason::InsufficientData {
                have: closes.len(),
                need,
            },
        );
    }

    let last = closes[closes.len() - 1];
    let reference = closes[closes.len() - 1 - period];
    if reference == 0.0 {
        return Outcome::Fallback(0.0, FallbackReason::UndefinedRatio);
    }

    Outcome::finite_or((last / reference - 1.0) * 100.0, 0.0)
}

pub fn calculate_momentum_set(closes: &[f64], windows: &MomentumWindows) -> Momentum {
    Momentum {
        short: calculate_momentum(closes, windows.short),
        medium: calculate_momentum(closes, windows.medium),
        long: calculate_momentum(closes, windows.long),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn momentum_offset_is_n_before_last() {
        // closes[i] = 100 + i; last = 110, 5 before last = closes[5] = 105.
        let closes: Vec<f64> = (0..=10).map(|i| 100.0 + i as f64).collect();
        let mom = calculate_momentum(&closes, 5);
        assert_relative_eq!(*mom.value(), (110.0 / 105.0 - 1.0) * 100.0);
    }

    #[test]
    fn momentum_requires_n_plus_one() {
        let closes = vec![100.0; 5];
        assert_eq!(
            calculate_momentum(&closes, 5),
            Outcome::Fallback(0.0, FallbackReason::InsufficientData { have: 5, need: 6 })
        );

        let closes = vec![100.0; 6];
        assert_eq!(calculate_momentum(&closes, 5), Outcome::Computed(0.0));
    }

    #[test]
    fn momentum_negative_change() {
        let closes = vec![100.0, 95.0, 90.0];
        let mom = calculate_momentum(&closes, 2);
        assert_relative_eq!(*mom.value(), -10.0);
    }

    #[test]
    fn momentum_zero_reference() {
        let closes = vec![0.0, 100.0, 110.0];
        assert_eq!(
            calculate_momentum(&closes, 2),
            Outcome::Fallback(0.0, FallbackReason::UndefinedRatio)
        );
    }

    #[test]
    fn constant_prices_have_zero_momentum() {
        let closes = vec![42.0; 60];
        let set = calculate_momentum_set(&closes, &MomentumWindows::default());
        assert_eq!(set.short, Outcome::Computed(0.0));
        assert_eq!(set.medium, Outcome::Computed(0.0));
        assert_eq!(set.long, Outcome::Computed(0.0));
    }

    #[test]
    fn long_window_falls_back_on_short_history() {
        let closes: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let set = calculate_momentum_set(&closes, &MomentumWindows::default());
        assert!(!set.short.is_fallback());
        assert!(!set.medium.is_fallback());
        assert_eq!(*set.long.value(), 0.0);
        assert!(set.long.is_fallback());
    }
}
