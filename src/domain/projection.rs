//! Report projections: rounded table rows and labelled dashboard entries.
//!
//! No new numbers are derived here beyond rounding and banding.

use crate::domain::scoring::{RuleContribution, ScoringRules};
use crate::domain::screening::{ScoreResult, ScreeningReport};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const STRONG_SCORE: u32 = 80;
pub const CONSIDER_SCORE: u32 = 60;
pub const WEAK_SCORE: u32 = 40;
pub const POOR_SCORE: u32 = 20;
pub const LOW_RISK_VOLATILITY: f64 = 15.0;
pub const MEDIUM_RISK_VOLATILITY: f64 = 25.0;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// One row of the tabular report, columns in output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Score")]
    pub score: u32,
    #[serde(rename = "RSI")]
    pub rsi: f64,
    #[serde(rename = "5D Momentum (%)")]
    pub momentum_short: f64,
    #[serde(rename = "20D Momentum (%)")]
    pub momentum_medium: f64,
    #[serde(rename = "50D Momentum (%)")]
    pub momentum_long: f64,
    #[serde(rename = "Above MA20")]
    pub above_ma_short: bool,
    #[serde(rename = "Above MA50")]
    pub above_ma_long: bool,
    #[serde(rename = "Volume Ratio")]
    pub volume_ratio: f64,
    #[serde(rename = "Volatility (%)")]
    pub volatility: f64,
}

impl From<&ScoreResult> for ReportRow {
    fn from(result: &ScoreResult) -> Self {
        let v = &result.indicators;
        Self {
            company: result.name.clone(),
            symbol: result.code.clone(),
            price: round_to(v.current_price, 2),
            score: result.score,
            rsi: round_to(v.rsi, 1),
            momentum_short: round_to(v.momentum_short, 1),
            momentum_medium: round_to(v.momentum_medium, 1),
            momentum_long: round_to(v.momentum_long, 1),
            above_ma_short: v.price_above_ma_short,
            above_ma_long: v.price_above_ma_long,
            volume_ratio: round_to(v.volume_ratio, 2),
            volatility: round_to(v.volatility, 1),
        }
    }
}

pub fn project_rows(report: &ScreeningReport) -> Vec<ReportRow> {
    report.results().iter().map(ReportRow::from).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Uptrend,
    Downtrend,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Uptrend => write!(f, "Uptrend"),
            Trend::Downtrend => write!(f, "Downtrend"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    StrongBuy,
    Consider,
    Weak,
    Avoid,
}

impl Recommendation {
    pub fn from_score(score: u32, momentum_medium: f64) -> Self {
        if score >= STRONG_SCORE && momentum_medium > 0.0 {
            Recommendation::StrongBuy
        } else if score >= CONSIDER_SCORE {
            Recommendation::Consider
        } else if score >= WEAK_SCORE {
            Recommendation::Weak
        } else {
            Recommendation::Avoid
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::StrongBuy => write!(f, "Strong Buy"),
            Recommendation::Consider => write!(f, "Consider"),
            Recommendation::Weak => write!(f, "Weak"),
            Recommendation::Avoid => write!(f, "Avoid"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bands on annualized volatility in percent.
    pub fn from_volatility(volatility: f64) -> Self {
        if volatility < LOW_RISK_VOLATILITY {
            RiskLevel::Low
        } else if volatility < MEDIUM_RISK_VOLATILITY {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low Risk"),
            RiskLevel::Medium => write!(f, "Medium Risk"),
            RiskLevel::High => write!(f, "High Risk"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiStatus {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiStatus {
    pub fn from_rsi(rsi: f64, rules: &ScoringRules) -> Self {
        if rsi < rules.rsi_lower {
            RsiStatus::Oversold
        } else if rsi > rules.rsi_upper {
            RsiStatus::Overbought
        } else {
            RsiStatus::Neutral
        }
    }
}

impl fmt::Display for RsiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsiStatus::Oversold => write!(f, "Oversold"),
            RsiStatus::Neutral => write!(f, "Neutral"),
            RsiStatus::Overbought => write!(f, "Overbought"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreGrade {
    Exceptional,
    Good,
    Fair,
    Weak,
    Poor,
}

impl ScoreGrade {
    pub fn from_score(score: u32) -> Self {
        if score >= STRONG_SCORE {
            ScoreGrade::Exceptional
        } else if score >= CONSIDER_SCORE {
            ScoreGrade::Good
        } else if score >= WEAK_SCORE {
            ScoreGrade::Fair
        } else if score >= POOR_SCORE {
            ScoreGrade::Weak
        } else {
            ScoreGrade::Poor
        }
    }
}

impl fmt::Display for ScoreGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScoreGrade::Exceptional => "Exceptional",
            ScoreGrade::Good => "Good",
            ScoreGrade::Fair => "Fair",
            ScoreGrade::Weak => "Weak",
            ScoreGrade::Poor => "Poor",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardEntry {
    /// 1-based position in the report.
    pub rank: usize,
    pub company: String,
    pub symbol: String,
    pub price: f64,
    pub score: u32,
    pub grade: ScoreGrade,
    pub rsi: f64,
    pub rsi_status: RsiStatus,
    pub momentum_short: f64,
    pub momentum_medium: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub above_ma_short: bool,
    pub above_ma_long: bool,
    pub volume_ratio: f64,
    pub volatility: f64,
    pub trend: Trend,
    pub recommendation: Recommendation,
    pub risk: RiskLevel,
}

impl DashboardEntry {
    pub fn from_result(rank: usize, result: &ScoreResult, rules: &ScoringRules) -> Self {
        let v = &result.indicators;
        let trend = if v.price_above_ma_short && v.ma_short_above_ma_long {
            Trend::Uptrend
        } else {
            Trend::Downtrend
        };
        Self {
            rank,
            company: result.name.clone(),
            symbol: result.code.clone(),
            price: round_to(v.current_price, 2),
            score: result.score,
            grade: ScoreGrade::from_score(result.score),
            rsi: round_to(v.rsi, 1),
            rsi_status: RsiStatus::from_rsi(v.rsi, rules),
            momentum_short: round_to(v.momentum_short, 1),
            momentum_medium: round_to(v.momentum_medium, 1),
            ma_short: round_to(v.ma_short, 2),
            ma_long: round_to(v.ma_long, 2),
            above_ma_short: v.price_above_ma_short,
            above_ma_long: v.price_above_ma_long,
            volume_ratio: round_to(v.volume_ratio, 2),
            volatility: round_to(v.volatility, 1),
            trend,
            recommendation: Recommendation::from_score(result.score, v.momentum_medium),
            risk: RiskLevel::from_volatility(v.volatility),
        }
    }
}

pub fn project_dashboard(report: &ScreeningReport, rules: &ScoringRules) -> Vec<DashboardEntry> {
    report
        .results()
        .iter()
        .enumerate()
        .map(|(i, r)| DashboardEntry::from_result(i + 1, r, rules))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total: usize,
    pub strong_opportunities: usize,
    pub uptrend_count: usize,
    pub uptrend_pct: f64,
    pub data_start: Option<NaiveDate>,
    pub data_end: Option<NaiveDate>,
}

pub fn summarize(report: &ScreeningReport, entries: &[DashboardEntry]) -> DashboardSummary {
    let total = entries.len();
    let uptrend_count = entries.iter().filter(|e| e.trend == Trend::Uptrend).count();
    let uptrend_pct = if total > 0 {
        round_to(uptrend_count as f64 / total as f64 * 100.0, 1)
    } else {
        0.0
    };

    DashboardSummary {
        total,
        strong_opportunities: entries.iter().filter(|e| e.score >= STRONG_SCORE).count(),
        uptrend_count,
        uptrend_pct,
        data_start: report.results().iter().filter_map(|r| r.first_date).min(),
        data_end: report.results().iter().filter_map(|r| r.last_date).max(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendFilter {
    #[default]
    All,
    Uptrend,
    Downtrend,
}

impl FromStr for TrendFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TrendFilter::All),
            "uptrend" | "up" => Ok(TrendFilter::Uptrend),
            "downtrend" | "down" => Ok(TrendFilter::Downtrend),
            _ => Err(format!("unknown trend filter: {}", s)),
        }
    }
}

impl TrendFilter {
    fn accepts(self, trend: Trend) -> bool {
        match self {
            TrendFilter::All => true,
            TrendFilter::Uptrend => trend == Trend::Uptrend,
            TrendFilter::Downtrend => trend == Trend::Downtrend,
        }
    }
}

pub fn filter_entries(
    entries: &[DashboardEntry],
    min_score: u32,
    trend: TrendFilter,
) -> Vec<&DashboardEntry> {
    entries
        .iter()
        .filter(|e| e.score >= min_score && trend.accepts(e.trend))
        .collect()
}

/// Per-rule breakdown for one instrument ("explain this score").
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreExplanation {
    pub company: String,
    pub symbol: String,
    pub contributions: Vec<RuleContribution>,
    /// Sum of contributions before clamping.
    pub calculated_total: u32,
    pub score: u32,
}

impl ScoreExplanation {
    pub fn lines(&self) -> Vec<String> {
        self.contributions
            .iter()
            .map(|c| {
                let mark = if c.fired() { "+" } else { "-" };
                format!("[{}] +{:>2} points: {}", mark, c.points, c.description)
            })
            .collect()
    }
}

/// Explanation for `code`, or for the top-ranked instrument when `code` is `None`.
pub fn explain(report: &ScreeningReport, code: Option<&str>) -> Option<ScoreExplanation> {
    let result = match code {
        Some(code) => report.find(code)?,
        None => report.results().first()?,
    };
    Some(ScoreExplanation {
        company: result.name.clone(),
        symbol: result.code.clone(),
        contributions: result.breakdown.clone(),
        calculated_total: result
            .breakdown
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.points)),
        score: result.score,
    })
}
