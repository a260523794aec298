//! Volume activity relative to its trailing average.
//!
//! ratio = V[last] / SMA(V, n). Falls back to 1.0 when the average is
//! unavailable (short history) or zero.

use crate::domain::indicator::moving_average::calculate_sma;
use crate::domain::outcome::{FallbackReason, Outcome};

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeAnalysis {
    pub avg_volume: Outcome<f64>,
    pub current_volume: f64,
    pub volume_ratio: Outcome<f64>,
    pub high_volume: bool,
}

pub fn calculate_volume_analysis(
    volumes: &[f64],
    window: usize,
    high_volume_ratio: f64,
) -> VolumeAnalysis {
    let current_volume = volumes.last().copied().unwrap_or(0.0);
    let avg_volume = calculate_sma(volumes, window);

    let volume_ratio = match avg_volume {
        Outcome::Fallback(_, reason) => Outcome::Fallback(1.0, reason),
        Outcome::Computed(avg) if avg == 0.0 => {
            Outcome::Fallback(1.0, FallbackReason::UndefinedRatio)
        }
        Outcome::Computed(avg) => Outcome::finite_or(current_volume / avg, 1.0),
    };

    VolumeAnalysis {
        avg_volume,
        current_volume,
        high_volume: *volume_ratio.value() > high_volume_ratio,
        volume_ratio,
    }
}
