//! screener: technical-indicator stock screener.
//!
//! Hexagonal architecture: indicator, scoring and screening logic in [`domain`],
//! port traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
