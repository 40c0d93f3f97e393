//! alphalegion — fundamentals-driven equity universe selection with a
//! yearly rebalance gate and benchmark-relative plotting.
//!
//! Hexagonal architecture: strategy logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
