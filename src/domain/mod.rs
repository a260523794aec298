//! Core domain types and logic.

pub mod ohlcv;
pub mod series;
pub mod outcome;
pub mod indicator;
pub mod scoring;
pub mod universe;
pub mod screening;
pub mod projection;
pub mod config_validation;
pub mod error;
