//! Configuration validation.
//!
//! Validates every key before a screen runs. Absent keys take their defaults,
//! so only present-but-wrong values are rejected.

use crate::domain::error::ScreenerError;
use crate::domain::scoring::SCORE_CEILING;
use crate::domain::universe::parse_universe;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Ten years of calendar days.
pub const MAX_LOOKBACK_DAYS: i64 = 3650;
/// Fewest bars any instrument may be scored on.
pub const MIN_OBSERVATIONS_FLOOR: i64 = 20;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_screen_config(config)?;
    validate_indicator_config(config)?;
    validate_scoring_config(config)?;
    validate_universe_config(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> ScreenerError {
    ScreenerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Values that do not parse as integers are rejected rather than defaulted.
fn read_int(config: &dyn ConfigPort, section: &str, key: &str, default: i64) -> Result<i64, ScreenerError> {
    match config.get_string(section, key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(section, key, format!("{} must be an integer", key))),
        _ => Ok(default),
    }
}

fn read_double(config: &dyn ConfigPort, section: &str, key: &str, default: f64) -> Result<f64, ScreenerError> {
    let value = match config.get_string(section, key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(section, key, format!("{} must be a number", key)))?,
        _ => default,
    };
    if !value.is_finite() {
        return Err(invalid(section, key, format!("{} must be finite", key)));
    }
    Ok(value)
}

fn require_positive(config: &dyn ConfigPort, section: &str, key: &str, default: i64) -> Result<i64, ScreenerError> {
    let value = read_int(config, section, key, default)?;
    if value < 1 {
        return Err(invalid(section, key, format!("{} must be positive", key)));
    }
    Ok(value)
}

fn require_range(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
    min: i64,
    max: i64,
) -> Result<i64, ScreenerError> {
    let value = read_int(config, section, key, default)?;
    if !(min..=max).contains(&value) {
        return Err(invalid(
            section,
            key,
            format!("{} must be within {}-{}", key, min, max),
        ));
    }
    Ok(value)
}

pub fn validate_screen_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    require_range(config, "screen", "lookback_days", 90, 1, MAX_LOOKBACK_DAYS)?;
    require_positive(config, "screen", "workers", 4)?;

    let top = read_int(config, "screen", "top", 5)?;
    if top < 0 {
        return Err(invalid("screen", "top", "top must be non-negative"));
    }

    if let Some(raw) = config.get_string("screen", "as_of") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && NaiveDate::parse_from_str(trimmed, DATE_FORMAT).is_err() {
            return Err(invalid(
                "screen",
                "as_of",
                "invalid as_of format, expected YYYY-MM-DD",
            ));
        }
    }

    if let Some(dir) = config.get_string("screen", "data_dir") {
        if dir.trim().is_empty() {
            return Err(invalid("screen", "data_dir", "data_dir must not be empty"));
        }
    }
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    require_positive(config, "indicators", "rsi_period", 14)?;
    let ma_short = require_positive(config, "indicators", "ma_short", 20)?;
    let ma_long = require_positive(config, "indicators", "ma_long", 50)?;
    if ma_short > ma_long {
        return Err(invalid(
            "indicators",
            "ma_short",
            "ma_short must not exceed ma_long",
        ));
    }

    require_positive(config, "indicators", "momentum_short", 5)?;
    require_positive(config, "indicators", "momentum_medium", 20)?;
    require_positive(config, "indicators", "momentum_long", 50)?;
    require_positive(config, "indicators", "volume_window", 20)?;
    let floor = read_int(config, "indicators", "min_observations", MIN_OBSERVATIONS_FLOOR)?;
    if floor < MIN_OBSERVATIONS_FLOOR {
        return Err(invalid(
            "indicators",
            "min_observations",
            format!("min_observations must be at least {}", MIN_OBSERVATIONS_FLOOR),
        ));
    }

    let ratio = read_double(config, "indicators", "high_volume_ratio", 1.5)?;
    if ratio <= 0.0 {
        return Err(invalid(
            "indicators",
            "high_volume_ratio",
            "high_volume_ratio must be positive",
        ));
    }

    let trading_days = read_double(config, "indicators", "trading_days", 252.0)?;
    if trading_days <= 0.0 {
        return Err(invalid(
            "indicators",
            "trading_days",
            "trading_days must be positive",
        ));
    }
    Ok(())
}

pub fn validate_scoring_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let lower = read_double(config, "scoring", "rsi_lower", 30.0)?;
    let upper = read_double(config, "scoring", "rsi_upper", 70.0)?;
    for (key, value) in [("rsi_lower", lower), ("rsi_upper", upper)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid("scoring", key, format!("{} must be within 0-100", key)));
        }
    }
    if lower > upper {
        return Err(invalid(
            "scoring",
            "rsi_lower",
            "rsi_lower must not exceed rsi_upper",
        ));
    }

    for key in [
        "momentum_strong_pct",
        "momentum_positive_pct",
        "volume_ratio_threshold",
    ] {
        read_double(config, "scoring", key, 0.0)?;
    }

    for key in [
        "rsi_points",
        "above_ma_short_points",
        "above_ma_long_points",
        "ma_cross_points",
        "momentum_strong_points",
        "momentum_positive_points",
        "volume_points",
        "max_score",
    ] {
        require_range(config, "scoring", key, 0, 0, i64::from(SCORE_CEILING))?;
    }
    Ok(())
}

pub fn validate_universe_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_string("universe", "instruments") {
        Some(list) if list.trim().is_empty() => Err(invalid(
            "universe",
            "instruments",
            "instrument list must not be empty",
        )),
        Some(list) => parse_universe(&list).map(|_| ()).map_err(ScreenerError::from),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapConfig(HashMap<(String, String), String>);

    impl MapConfig {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                    .collect(),
            )
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0.get(&(section.to_string(), key.to_string())).cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    fn invalid_key(result: Result<(), ScreenerError>) -> String {
        match result {
            Err(ScreenerError::ConfigInvalid { key, .. }) => key,
            other => panic!("expected ConfigInvalid, got {:?}", other),
        }
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(validate_config(&MapConfig::new(&[])).is_ok());
    }

    #[test]
    fn full_config_is_valid() {
        let config = MapConfig::new(&[
            ("screen", "lookback_days", "120"),
            ("screen", "workers", "8"),
            ("screen", "as_of", "2025-06-30"),
            ("indicators", "ma_short", "10"),
            ("indicators", "ma_long", "30"),
            ("scoring", "rsi_lower", "40"),
            ("scoring", "rsi_upper", "60"),
            ("universe", "instruments", "DBS:D05.SI, OCBC:O39.SI"),
        ]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_workers_rejected() {
        let config = MapConfig::new(&[("screen", "workers", "0")]);
        assert_eq!(invalid_key(validate_config(&config)), "workers");
    }

    #[test]
    fn bad_as_of_rejected() {
        let config = MapConfig::new(&[("screen", "as_of", "30/06/2025")]);
        assert_eq!(invalid_key(validate_config(&config)), "as_of");
    }

    #[test]
    fn empty_as_of_means_latest() {
        let config = MapConfig::new(&[("screen", "as_of", "")]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn non_numeric_period_rejected() {
        let config = MapConfig::new(&[("indicators", "rsi_period", "fourteen")]);
        assert_eq!(invalid_key(validate_config(&config)), "rsi_period");
    }

    #[test]
    fn zero_period_rejected() {
        let config = MapConfig::new(&[("indicators", "volume_window", "0")]);
        assert_eq!(invalid_key(validate_config(&config)), "volume_window");
    }

    #[test]
    fn ma_order_enforced() {
        let config = MapConfig::new(&[
            ("indicators", "ma_short", "60"),
            ("indicators", "ma_long", "50"),
        ]);
        assert_eq!(invalid_key(validate_config(&config)), "ma_short");
    }

    #[test]
    fn rsi_band_checked() {
        let inverted = MapConfig::new(&[
            ("scoring", "rsi_lower", "70"),
            ("scoring", "rsi_upper", "30"),
        ]);
        assert_eq!(invalid_key(validate_config(&inverted)), "rsi_lower");

        let out_of_range = MapConfig::new(&[("scoring", "rsi_upper", "120")]);
        assert_eq!(invalid_key(validate_config(&out_of_range)), "rsi_upper");
    }

    #[test]
    fn negative_points_rejected() {
        let config = MapConfig::new(&[("scoring", "volume_points", "-5")]);
        assert_eq!(invalid_key(validate_config(&config)), "volume_points");
    }

    #[test]
    fn oversized_points_rejected() {
        let config = MapConfig::new(&[
            ("scoring", "rsi_points", "3000000000"),
            ("scoring", "above_ma_short_points", "3000000000"),
        ]);
        assert_eq!(invalid_key(validate_config(&config)), "rsi_points");

        let config = MapConfig::new(&[("scoring", "max_score", "101")]);
        assert_eq!(invalid_key(validate_config(&config)), "max_score");

        let config = MapConfig::new(&[("scoring", "volume_points", "100")]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn lookback_ceiling_enforced() {
        let config = MapConfig::new(&[("screen", "lookback_days", "4000000000")]);
        assert_eq!(invalid_key(validate_config(&config)), "lookback_days");

        let config = MapConfig::new(&[("screen", "lookback_days", "3650")]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn min_observations_floor_enforced() {
        let config = MapConfig::new(&[("indicators", "min_observations", "19")]);
        assert_eq!(invalid_key(validate_config(&config)), "min_observations");

        let config = MapConfig::new(&[("indicators", "min_observations", "60")]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn non_finite_threshold_rejected() {
        let config = MapConfig::new(&[("scoring", "momentum_strong_pct", "inf")]);
        assert_eq!(invalid_key(validate_config(&config)), "momentum_strong_pct");
    }

    #[test]
    fn universe_errors_surface() {
        let config = MapConfig::new(&[("universe", "instruments", "A:D05.SI,B:D05.SI")]);
        assert!(matches!(
            validate_config(&config),
            Err(ScreenerError::Universe(_))
        ));

        let empty = MapConfig::new(&[("universe", "instruments", "  ")]);
        assert_eq!(invalid_key(validate_config(&empty)), "instruments");
    }
}
