//! Technical indicators evaluated at the last observation of a series.
//!
//! Each calculator is a pure, total function returning an
//! [`Outcome`](crate::domain::outcome::Outcome): a computed value or a
//! documented sentinel with the reason it was used.
//! - RSI: 50.0
//! - moving averages: current price
//! - momentum: 0.0
//! - volume ratio: 1.0
//! - volatility: 0.0
//!
//! [`compute_indicators`] assembles these into an [`IndicatorVector`].

pub mod momentum;
pub mod moving_average;
pub mod rsi;
pub mod volatility;
pub mod volume;

use crate::domain::outcome::{FallbackReason, Outcome};
use crate::domain::series::PriceSeries;
use momentum::{MomentumWindows, calculate_momentum_set};
use moving_average::calculate_moving_averages;
use rsi::calculate_rsi;
use std::fmt;
use volatility::{TRADING_DAYS_PER_YEAR, calculate_volatility};
use volume::calculate_volume_analysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Rsi(usize),
    Sma(usize),
    Momentum(usize),
    AvgVolume(usize),
    VolumeRatio(usize),
    Volatility,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Momentum(period) => write!(f, "MOM({})", period),
            IndicatorType::AvgVolume(period) => write!(f, "AVGVOL({})", period),
            IndicatorType::VolumeRatio(period) => write!(f, "VOLRATIO({})", period),
            IndicatorType::Volatility => write!(f, "VOLATILITY"),
        }
    }
}

/// Window lengths and thresholds used by [`compute_indicators`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub ma_short: usize,
    pub ma_long: usize,
    pub momentum: MomentumWindows,
    pub volume_window: usize,
    pub high_volume_ratio: f64,
    /// Series shorter than this are excluded from screening entirely.
    pub min_observations: usize,
    pub trading_days: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ma_short: 20,
            ma_long: 50,
            momentum: MomentumWindows::default(),
            volume_window: 20,
            high_volume_ratio: 1.5,
            min_observations: 20,
            trading_days: TRADING_DAYS_PER_YEAR,
        }
    }
}

/// Point-in-time indicator values for one instrument. Every float is finite.
///
/// With default parameters `ma_short`/`ma_long` are MA20/MA50 and the
/// momentum fields are the 5/20/50-observation changes in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorVector {
    pub current_price: f64,
    pub rsi: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub price_above_ma_short: bool,
    pub price_above_ma_long: bool,
    pub ma_short_above_ma_long: bool,
    pub momentum_short: f64,
    pub momentum_medium: f64,
    pub momentum_long: f64,
    pub avg_volume: f64,
    pub current_volume: f64,
    pub volume_ratio: f64,
    pub high_volume: bool,
    pub volatility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedFallback {
    pub indicator: IndicatorType,
    pub reason: FallbackReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorReport {
    pub vector: IndicatorVector,
    pub fallbacks: Vec<AppliedFallback>,
}

fn track(fallbacks: &mut Vec<AppliedFallback>, indicator: IndicatorType, outcome: Outcome<f64>) -> f64 {
    if let Some(reason) = outcome.fallback_reason() {
        fallbacks.push(AppliedFallback { indicator, reason });
    }
    outcome.into_value()
}

pub fn compute_indicators(series: &PriceSeries, params: &IndicatorParams) -> IndicatorReport {
    let closes = series.closes();
    let volumes = series.volumes();
    let mut fallbacks = Vec::new();

    let rsi = track(
        &mut fallbacks,
        IndicatorType::Rsi(params.rsi_period),
        calculate_rsi(&closes, params.rsi_period),
    );

    let ma = calculate_moving_averages(&closes, params.ma_short, params.ma_long);
    let ma_short = track(&mut fallbacks, IndicatorType::Sma(params.ma_short), ma.ma_short);
    let ma_long = track(&mut fallbacks, IndicatorType::Sma(params.ma_long), ma.ma_long);

    let mom = calculate_momentum_set(&closes, &params.momentum);
    let momentum_short = track(
        &mut fallbacks,
        IndicatorType::Momentum(params.momentum.short),
        mom.short,
    );
    let momentum_medium = track(
        &mut fallbacks,
        IndicatorType::Momentum(params.momentum.medium),
        mom.medium,
    );
    let momentum_long = track(
        &mut fallbacks,
        IndicatorType::Momentum(params.momentum.long),
        mom.long,
    );

    let va = calculate_volume_analysis(&volumes, params.volume_window, params.high_volume_ratio);
    let avg_volume = track(
        &mut fallbacks,
        IndicatorType::AvgVolume(params.volume_window),
        va.avg_volume,
    );
    let volume_ratio = track(
        &mut fallbacks,
        IndicatorType::VolumeRatio(params.volume_window),
        va.volume_ratio,
    );

    let volatility = track(
        &mut fallbacks,
        IndicatorType::Volatility,
        calculate_volatility(&closes, params.trading_days),
    );

    IndicatorReport {
        vector: IndicatorVector {
            current_price: ma.current_price,
            rsi,
            ma_short,
            ma_long,
            price_above_ma_short: ma.price_above_ma_short,
            price_above_ma_long: ma.price_above_ma_long,
            ma_short_above_ma_long: ma.ma_short_above_ma_long,
            momentum_short,
            momentum_medium,
            momentum_long,
            avg_volume,
            current_volume: va.current_volume,
            volume_ratio,
            high_volume: va.high_volume,
            volatility,
        },
        fallbacks,
    }
}
