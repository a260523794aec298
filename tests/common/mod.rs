#![allow(dead_code)]

use chrono::NaiveDate;
use screener::domain::error::ScreenerError;
pub use screener::domain::ohlcv::OhlcvBar;
use screener::domain::universe::{Instrument, Universe};
use screener::ports::data_port::DataPort;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub fetches: AtomicUsize,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self, code: &str, _lookback_days: u32) -> Result<Vec<OhlcvBar>, ScreenerError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.errors.get(code) {
            return Err(ScreenerError::Data {
                code: code.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(code).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScreenerError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
}

pub fn make_bars(closes: &[f64], volumes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| OhlcvBar {
            date: start_date() + chrono::Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume,
        })
        .collect()
}

/// Rising zigzag: +2 on odd steps, -1 on even steps, starting at 50.
/// Sixty bars end at 81 with RSI 66.7 and 20-bar momentum of 14%.
pub fn zigzag_closes(count: usize) -> Vec<f64> {
    let mut closes = vec![50.0];
    for i in 1..count {
        let prev = closes[i - 1];
        closes.push(if i % 2 == 1 { prev + 2.0 } else { prev - 1.0 });
    }
    closes
}

/// Sixty-bar uptrend with a volume spike on the last bar; scores 100.
pub fn uptrend_bars() -> Vec<OhlcvBar> {
    let closes = zigzag_closes(60);
    let mut volumes = vec![1000.0; 59];
    volumes.push(1300.0);
    make_bars(&closes, &volumes)
}

/// Sixty-bar steady decline with flat volume; scores 0.
pub fn decline_bars() -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 - 0.5 * i as f64).collect();
    make_bars(&closes, &vec![1000.0; 60])
}

pub fn short_bars(count: usize) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| 10.0 + i as f64 * 0.1).collect();
    make_bars(&closes, &vec![500.0; count])
}

pub fn flat_bars(count: usize, price: f64) -> Vec<OhlcvBar> {
    make_bars(&vec![price; count], &vec![1000.0; count])
}

pub fn universe(entries: &[(&str, &str)]) -> Universe {
    Universe {
        instruments: entries
            .iter()
            .map(|(name, code)| Instrument::new(*name, *code))
            .collect(),
    }
}

/// `date,open,high,low,close,volume` file content for the given bars.
pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for bar in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    out
}
