//! Rule-table scorer.
//!
//! The score is the sum of independent rule contributions, clamped to
//! `max_score` (never above 100). Within the momentum rule the tiers are
//! mutually exclusive: the strong tier wins over the positive tier.
//!
//! Every rule appears in the breakdown in table order, with zero points when
//! it did not fire, so two breakdowns for the same input are identical.

use crate::domain::indicator::IndicatorVector;
use std::fmt;

pub const SCORE_CEILING: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRules {
    pub rsi_lower: f64,
    pub rsi_upper: f64,
    pub rsi_points: u32,
    pub above_ma_short_points: u32,
    pub above_ma_long_points: u32,
    pub ma_cross_points: u32,
    pub momentum_strong_pct: f64,
    pub momentum_strong_points: u32,
    pub momentum_positive_pct: f64,
    pub momentum_positive_points: u32,
    pub volume_ratio_threshold: f64,
    pub volume_points: u32,
    pub max_score: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            rsi_lower: 30.0,
            rsi_upper: 70.0,
            rsi_points: 20,
            above_ma_short_points: 20,
            above_ma_long_points: 20,
            ma_cross_points: 15,
            momentum_strong_pct: 5.0,
            momentum_strong_points: 20,
            momentum_positive_pct: 0.0,
            momentum_positive_points: 10,
            volume_ratio_threshold: 1.2,
            volume_points: 10,
            max_score: SCORE_CEILING,
        }
    }
}

impl ScoringRules {
    /// Highest total the table can award before clamping. Saturates at `u32::MAX`.
    pub fn max_raw_total(&self) -> u32 {
        [
            self.rsi_points,
            self.above_ma_short_points,
            self.above_ma_long_points,
            self.ma_cross_points,
            self.momentum_strong_points.max(self.momentum_positive_points),
            self.volume_points,
        ]
        .iter()
        .fold(0u32, |acc, points| acc.saturating_add(*points))
    }

    /// One line per rule, in breakdown order, for display.
    pub fn describe(&self) -> Vec<String> {
        vec![
            format!(
                "+{} RSI within {}-{}",
                self.rsi_points, self.rsi_lower, self.rsi_upper
            ),
            format!("+{} price above short moving average", self.above_ma_short_points),
            format!("+{} price above long moving average", self.above_ma_long_points),
            format!(
                "+{} short moving average above long moving average",
                self.ma_cross_points
            ),
            format!(
                "+{} momentum above {}% (else +{} above {}%)",
                self.momentum_strong_points,
                self.momentum_strong_pct,
                self.momentum_positive_points,
                self.momentum_positive_pct
            ),
            format!(
                "+{} volume ratio above {}",
                self.volume_points, self.volume_ratio_threshold
            ),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreRule {
    RsiBand,
    AboveMaShort,
    AboveMaLong,
    MaCross,
    Momentum,
    Volume,
}

impl fmt::Display for ScoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoreRule::RsiBand => "rsi_band",
            ScoreRule::AboveMaShort => "above_ma_short",
            ScoreRule::AboveMaLong => "above_ma_long",
            ScoreRule::MaCross => "ma_cross",
            ScoreRule::Momentum => "momentum",
            ScoreRule::Volume => "volume",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleContribution {
    pub rule: ScoreRule,
    pub description: String,
    pub points: u32,
}

impl RuleContribution {
    pub fn fired(&self) -> bool {
        self.points > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub score: u32,
    /// Sum of all contributions before clamping.
    pub raw_total: u32,
    pub breakdown: Vec<RuleContribution>,
}

fn contribution(rule: ScoreRule, fired: bool, points: u32, hit: String, miss: String) -> RuleContribution {
    if fired {
        RuleContribution {
            rule,
            description: hit,
            points,
        }
    } else {
        RuleContribution {
            rule,
            description: miss,
            points: 0,
        }
    }
}

pub fn score(vector: &IndicatorVector, rules: &ScoringRules) -> ScoreCard {
    let mut breakdown = Vec::with_capacity(6);

    let rsi_ok = vector.rsi >= rules.rsi_lower && vector.rsi <= rules.rsi_upper;
    breakdown.push(contribution(
        ScoreRule::RsiBand,
        rsi_ok,
        rules.rsi_points,
        format!("Healthy RSI ({:.1} within {}-{})", vector.rsi, rules.rsi_lower, rules.rsi_upper),
        format!("RSI outside healthy range ({:.1})", vector.rsi),
    ));

    breakdown.push(contribution(
        ScoreRule::AboveMaShort,
        vector.price_above_ma_short,
        rules.above_ma_short_points,
        "Price above short moving average".to_string(),
        "Price below short moving average".to_string(),
    ));

    breakdown.push(contribution(
        ScoreRule::AboveMaLong,
        vector.price_above_ma_long,
        rules.above_ma_long_points,
        "Price above long moving average".to_string(),
        "Price below long moving average".to_string(),
    ));

    breakdown.push(contribution(
        ScoreRule::MaCross,
        vector.ma_short_above_ma_long,
        rules.ma_cross_points,
        "Short moving average above long".to_string(),
        "Short moving average below long".to_string(),
    ));

    let mom = vector.momentum_medium;
    let momentum = if mom > rules.momentum_strong_pct {
        RuleContribution {
            rule: ScoreRule::Momentum,
            description: format!("Strong gains ({:.1}% > {}%)", mom, rules.momentum_strong_pct),
            points: rules.momentum_strong_points,
        }
    } else if mom > rules.momentum_positive_pct {
        RuleContribution {
            rule: ScoreRule::Momentum,
            description: format!("Modest gains ({:.1}% > {}%)", mom, rules.momentum_positive_pct),
            points: rules.momentum_positive_points,
        }
    } else {
        RuleContribution {
            rule: ScoreRule::Momentum,
            description: format!("No positive momentum ({:.1}%)", mom),
            points: 0,
        }
    };
    breakdown.push(momentum);

    breakdown.push(contribution(
        ScoreRule::Volume,
        vector.volume_ratio > rules.volume_ratio_threshold,
        rules.volume_points,
        format!("High trading volume ({:.2}x)", vector.volume_ratio),
        format!("Normal/low trading volume ({:.2}x)", vector.volume_ratio),
    ));

    let raw_total = breakdown
        .iter()
        .fold(0u32, |acc, c| acc.saturating_add(c.points));
    let ceiling = rules.max_score.min(SCORE_CEILING);

    ScoreCard {
        score: raw_total.min(ceiling),
        raw_total,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullish_vector() -> IndicatorVector {
        IndicatorVector {
            current_price: 12.0,
            rsi: 55.0,
            ma_short: 11.5,
            ma_long: 11.0,
            price_above_ma_short: true,
            price_above_ma_long: true,
            ma_short_above_ma_long: true,
            momentum_short: 2.0,
            momentum_medium: 8.0,
            momentum_long: 12.0,
            avg_volume: 1_000_000.0,
            current_volume: 1_300_000.0,
            volume_ratio: 1.3,
            high_volume: false,
            volatility: 18.0,
        }
    }

    fn bearish_vector() -> IndicatorVector {
        IndicatorVector {
            current_price: 9.0,
            rsi: 75.0,
            ma_short: 9.5,
            ma_long: 10.0,
            price_above_ma_short: false,
            price_above_ma_long: false,
            ma_short_above_ma_long: false,
            momentum_short: -1.0,
            momentum_medium: -2.0,
            momentum_long: -5.0,
            avg_volume: 1_000_000.0,
            current_volume: 900_000.0,
            volume_ratio: 0.9,
            high_volume: false,
            volatility: 30.0,
        }
    }

    #[test]
    fn bullish_clamps_to_100() {
        let card = score(&bullish_vector(), &ScoringRules::default());
        assert_eq!(card.raw_total, 105);
        assert_eq!(card.score, 100);
    }

    #[test]
    fn bearish_scores_zero() {
        let card = score(&bearish_vector(), &ScoringRules::default());
        assert_eq!(card.raw_total, 0);
        assert_eq!(card.score, 0);
        assert!(card.breakdown.iter().all(|c| !c.fired()));
    }

    #[test]
    fn breakdown_order_is_fixed() {
        let expected = vec![
            ScoreRule::RsiBand,
            ScoreRule::AboveMaShort,
            ScoreRule::AboveMaLong,
            ScoreRule::MaCross,
            ScoreRule::Momentum,
            ScoreRule::Volume,
        ];
        for v in [bullish_vector(), bearish_vector()] {
            let card = score(&v, &ScoringRules::default());
            let rules: Vec<ScoreRule> = card.breakdown.iter().map(|c| c.rule).collect();
            assert_eq!(rules, expected);
        }
    }

    #[test]
    fn modest_momentum_tier() {
        let v = IndicatorVector {
            momentum_medium: 3.0,
            ..bearish_vector()
        };
        let card = score(&v, &ScoringRules::default());
        assert_eq!(card.score, 10);
        assert_eq!(card.breakdown[4].points, 10);
    }

    #[test]
    fn momentum_tiers_are_exclusive() {
        let v = IndicatorVector {
            momentum_medium: 5.1,
            ..bearish_vector()
        };
        assert_eq!(score(&v, &ScoringRules::default()).score, 20);
    }

    #[test]
    fn momentum_boundaries_are_strict() {
        let at_five = IndicatorVector {
            momentum_medium: 5.0,
            ..bearish_vector()
        };
        assert_eq!(score(&at_five, &ScoringRules::default()).score, 10);

        let at_zero = IndicatorVector {
            momentum_medium: 0.0,
            ..bearish_vector()
        };
        assert_eq!(score(&at_zero, &ScoringRules::default()).score, 0);
    }

    #[test]
    fn rsi_band_is_inclusive() {
        for rsi in [30.0, 70.0] {
            let v = IndicatorVector {
                rsi,
                ..bearish_vector()
            };
            assert_eq!(score(&v, &ScoringRules::default()).score, 20);
        }
    }

    #[test]
    fn volume_threshold_is_strict() {
        let v = IndicatorVector {
            volume_ratio: 1.2,
            ..bearish_vector()
        };
        assert_eq!(score(&v, &ScoringRules::default()).score, 0);
    }

    #[test]
    fn custom_rules_apply() {
        let rules = ScoringRules {
            rsi_points: 5,
            max_score: 50,
            ..ScoringRules::default()
        };
        let card = score(&bullish_vector(), &rules);
        assert_eq!(card.raw_total, 90);
        assert_eq!(card.score, 50);
    }

    #[test]
    fn max_score_above_ceiling_is_capped() {
        let rules = ScoringRules {
            max_score: 500,
            ..ScoringRules::default()
        };
        assert_eq!(score(&bullish_vector(), &rules).score, 100);
    }

    #[test]
    fn default_table_exceeds_ceiling() {
        assert_eq!(ScoringRules::default().max_raw_total(), 105);
        assert_eq!(ScoringRules::default().describe().len(), 6);
    }

    #[test]
    fn oversized_points_saturate() {
        let rules = ScoringRules {
            rsi_points: 3_000_000_000,
            above_ma_short_points: 3_000_000_000,
            above_ma_long_points: u32::MAX,
            ..ScoringRules::default()
        };
        let card = score(&bullish_vector(), &rules);
        assert_eq!(card.raw_total, u32::MAX);
        assert_eq!(card.score, 100);
        assert_eq!(rules.max_raw_total(), u32::MAX);
    }
}
