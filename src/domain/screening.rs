//! Screening pipeline: fetch, compute, score and rank a universe.
//!
//! Per instrument: `Pending -> Fetched -> Scored`, or `Pending -> Failed`.
//! A failed instrument (fetch error, malformed series, fewer than
//! `min_observations` bars) is skipped and recorded; it never aborts the run.
//!
//! Instruments are processed on a bounded rayon pool. Results are collected
//! in universe order and then stable-sorted by score descending, so equal
//! scores keep universe order whatever the worker count.

use crate::domain::error::ScreenerError;
use crate::domain::indicator::{
    AppliedFallback, IndicatorParams, IndicatorVector, compute_indicators,
};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::scoring::{RuleContribution, ScoringRules, score};
use crate::domain::series::PriceSeries;
use crate::domain::universe::{Instrument, Universe};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info, warn};

pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;
pub const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningConfig {
    pub indicators: IndicatorParams,
    pub scoring: ScoringRules,
    pub lookback_days: u32,
    /// Upper bound on concurrent fetches against the data port.
    pub workers: usize,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorParams::default(),
            scoring: ScoringRules::default(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            workers: DEFAULT_WORKERS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentState {
    Pending,
    Fetched,
    Scored,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    FetchFailed(String),
    NoData,
    InsufficientData { bars: usize, minimum: usize },
    InvalidSeries(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FetchFailed(reason) => write!(f, "fetch failed: {}", reason),
            SkipReason::NoData => write!(f, "no data found"),
            SkipReason::InsufficientData { bars, minimum } => {
                write!(f, "only {} bars, minimum {} required", bars, minimum)
            }
            SkipReason::InvalidSeries(reason) => write!(f, "invalid series: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedInstrument {
    pub instrument: Instrument,
    pub reason: SkipReason,
}

/// Scored instrument. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub code: String,
    pub name: String,
    pub indicators: IndicatorVector,
    pub score: u32,
    pub breakdown: Vec<RuleContribution>,
    pub fallbacks: Vec<AppliedFallback>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Scored instruments, highest score first, ties in universe order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreeningReport {
    results: Vec<ScoreResult>,
}

impl ScreeningReport {
    /// Stable sort by score descending. `results` must be in universe order.
    pub fn rank(mut results: Vec<ScoreResult>) -> Self {
        results.sort_by(|a, b| b.score.cmp(&a.score));
        Self { results }
    }

    pub fn results(&self) -> &[ScoreResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn top(&self, n: usize) -> &[ScoreResult] {
        &self.results[..n.min(self.results.len())]
    }

    pub fn find(&self, code: &str) -> Option<&ScoreResult> {
        self.results
            .iter()
            .find(|r| r.code.eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningRun {
    pub report: ScreeningReport,
    pub skipped: Vec<SkippedInstrument>,
    pub scanned: usize,
}

impl ScreeningRun {
    pub fn state_of(&self, code: &str) -> InstrumentState {
        if self.report.find(code).is_some() {
            InstrumentState::Scored
        } else if self
            .skipped
            .iter()
            .any(|s| s.instrument.code.eq_ignore_ascii_case(code))
        {
            InstrumentState::Failed
        } else {
            InstrumentState::Pending
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Screened {} instruments: {} scored, {} skipped",
            self.scanned,
            self.report.len(),
            self.skipped.len()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentOutcome {
    Scored(ScoreResult),
    Failed(SkippedInstrument),
}

fn transition(instrument: &Instrument, from: InstrumentState, to: InstrumentState) {
    debug!(code = %instrument.code, ?from, ?to, "instrument state");
}

/// Compute indicators and score for already-fetched bars. No I/O.
pub fn evaluate_bars(
    instrument: &Instrument,
    bars: Vec<OhlcvBar>,
    config: &ScreeningConfig,
) -> Result<ScoreResult, SkipReason> {
    let series = PriceSeries::new(instrument.code.clone(), bars)
        .map_err(|e| SkipReason::InvalidSeries(e.to_string()))?;
    if series.is_empty() {
        return Err(SkipReason::NoData);
    }

    let minimum = config.indicators.min_observations;
    if series.len() < minimum {
        return Err(SkipReason::InsufficientData {
            bars: series.len(),
            minimum,
        });
    }

    let report = compute_indicators(&series, &config.indicators);
    for fallback in &report.fallbacks {
        debug!(
            code = %series.code(),
            indicator = %fallback.indicator,
            reason = %fallback.reason,
            "indicator fallback"
        );
    }

    let card = score(&report.vector, &config.scoring);

    Ok(ScoreResult {
        code: instrument.code.clone(),
        name: instrument.name.clone(),
        indicators: report.vector,
        score: card.score,
        breakdown: card.breakdown,
        fallbacks: report.fallbacks,
        first_date: series.first_date(),
        last_date: series.last_date(),
    })
}

pub fn screen_instrument(
    data_port: &dyn DataPort,
    instrument: &Instrument,
    config: &ScreeningConfig,
) -> InstrumentOutcome {
    let mut state = InstrumentState::Pending;
    let result = match data_port.fetch_series(&instrument.code, config.lookback_days) {
        Ok(bars) => {
            transition(instrument, state, InstrumentState::Fetched);
            state = InstrumentState::Fetched;
            evaluate_bars(instrument, bars, config)
        }
        Err(e) => Err(SkipReason::FetchFailed(e.to_string())),
    };

    match result {
        Ok(scored) => {
            transition(instrument, state, InstrumentState::Scored);
            info!(
                code = %instrument.code,
                name = %instrument.name,
                score = scored.score,
                "scored"
            );
            InstrumentOutcome::Scored(scored)
        }
        Err(reason) => {
            transition(instrument, state, InstrumentState::Failed);
            warn!(code = %instrument.code, name = %instrument.name, %reason, "skipping");
            InstrumentOutcome::Failed(SkippedInstrument {
                instrument: instrument.clone(),
                reason,
            })
        }
    }
}

pub fn run_screen(
    data_port: &dyn DataPort,
    universe: &Universe,
    config: &ScreeningConfig,
) -> Result<ScreeningRun, ScreenerError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.max(1))
        .build()
        .map_err(|e| ScreenerError::WorkerPool {
            reason: e.to_string(),
        })?;

    info!(
        instruments = universe.count(),
        workers = config.workers.max(1),
        "starting screen"
    );

    let outcomes: Vec<InstrumentOutcome> = pool.install(|| {
        universe
            .instruments
            .par_iter()
            .map(|instrument| screen_instrument(data_port, instrument, config))
            .collect()
    });

    let mut scored = Vec::with_capacity(outcomes.len());
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            InstrumentOutcome::Scored(result) => scored.push(result),
            InstrumentOutcome::Failed(skip) => skipped.push(skip),
        }
    }

    let run = ScreeningRun {
        report: ScreeningReport::rank(scored),
        skipped,
        scanned: universe.count(),
    };
    info!("{}", run.summary());
    Ok(run)
}
