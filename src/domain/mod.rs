//! Core strategy types and logic.

pub mod fundamentals;
pub mod selection;
pub mod rebalance;
pub mod benchmark;
pub mod algorithm;
pub mod config_validation;
pub mod error;
