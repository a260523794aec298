//! Port traits: the boundary between screening logic and the outside world.

pub mod config_port;
pub mod data_port;
pub mod report_port;
