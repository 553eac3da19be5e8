//! Min-conflicts local search with an optional tabu list.
//!
//! Repairs a complete random assignment one variable at a time, always
//! moving a conflicted variable to its least-conflicting value. A bounded
//! tabu list of recently moved variables keeps the search from cycling.
//!
//! # References
//!
//! - Minton et al. (1992), "Minimizing Conflicts: A Heuristic Repair Method"
//! - Glover (1989), "Tabu Search, Part I"

mod config;
mod runner;
mod tabu;

pub use config::MinConflictsConfig;
pub use runner::MinConflictsRunner;
