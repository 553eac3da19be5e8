//! Constraint weighting local search.
//!
//! A breakout-style repair search: unsatisfied constraints get heavier every
//! step, so local minima of the plain conflict count stop being minima of
//! the weighted one.
//!
//! # Reference
//!
//! Morris, P. (1993). "The Breakout Method for Escaping from Local Minima",
//! *AAAI-93*, 40-45.

mod config;
mod runner;

pub use config::WeightingConfig;
pub use runner::WeightingRunner;
