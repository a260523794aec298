//! Domain error types.

use crate::domain::series::SeriesError;
use crate::domain::universe::UniverseError;

/// Top-level error type for the screener.
///
/// Per-instrument problems never surface here during a run; the pipeline
/// records them as skipped instruments instead.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error for {code}: {reason}")]
    Data { code: String, reason: String },

    #[error("invalid series for {code}: {source}")]
    InvalidSeries {
        code: String,
        #[source]
        source: SeriesError,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error("worker pool error: {reason}")]
    WorkerPool { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) | ScreenerError::WorkerPool { .. } => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. } => 2,
            ScreenerError::Data { .. } | ScreenerError::InvalidSeries { .. } => 3,
            ScreenerError::Universe(_) => 4,
            ScreenerError::Report { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn display_messages() {
        let err = ScreenerError::ConfigInvalid {
            section: "indicators".into(),
            key: "rsi_period".into(),
            reason: "must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [indicators] rsi_period: must be positive"
        );

        let err = ScreenerError::InvalidSeries {
            code: "D05.SI".into(),
            source: SeriesError::DuplicateDate {
                date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            },
        };
        assert_eq!(
            err.to_string(),
            "invalid series for D05.SI: duplicate bar for 2025-06-02"
        );
    }

    #[test]
    fn universe_error_converts() {
        let err: ScreenerError = UniverseError::EmptyToken.into();
        assert!(matches!(err, ScreenerError::Universe(_)));
    }
}
