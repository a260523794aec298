//! Typed indicator outcomes.
//!
//! Indicator functions are total: when a value cannot be computed they return
//! a documented sentinel wrapped in [`Outcome::Fallback`] together with the
//! reason, so callers can tell a computed value from a default.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Fewer observations than the window requires.
    InsufficientData { have: usize, need: usize },
    /// Zero denominator (RSI with no movement, volume ratio with zero average).
    UndefinedRatio,
    /// Intermediate arithmetic produced NaN or infinity.
    NonFinite,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::InsufficientData { have, need } => {
                write!(f, "insufficient data ({} of {} observations)", have, need)
            }
            FallbackReason::UndefinedRatio => write!(f, "undefined ratio"),
            FallbackReason::NonFinite => write!(f, "non-finite result"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome<T> {
    Computed(T),
    Fallback(T, FallbackReason),
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Computed(v) | Outcome::Fallback(v, _) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Computed(v) | Outcome::Fallback(v, _) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback(..))
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            Outcome::Computed(_) => None,
            Outcome::Fallback(_, reason) => Some(*reason),
        }
    }
}

impl Outcome<f64> {
    /// `Computed(value)` if finite, otherwise `Fallback(sentinel, NonFinite)`.
    pub fn finite_or(value: f64, sentinel: f64) -> Self {
        if value.is_finite() {
            Outcome::Computed(value)
        } else {
            Outcome::Fallback(sentinel, FallbackReason::NonFinite)
        }
    }
}
