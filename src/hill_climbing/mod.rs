//! Random-restart first-choice hill climbing.
//!
//! Climbs from a fresh starting state on every restart, moving to the first
//! sampled successor that scores strictly higher. The search is generic over
//! a [`LocalSearchProblem`](crate::local::LocalSearchProblem) strategy.
//!
//! # References
//!
//! - Russell & Norvig (2010), *Artificial Intelligence: A Modern Approach*,
//!   3rd ed., section 4.1.1

mod config;
mod runner;

pub use config::HillClimbingConfig;
pub use runner::{HillClimbingResult, HillClimbingRunner};
