//! Systematic search.
//!
//! - [`BacktrackingRunner`]: depth-first search with pluggable variable
//!   selection, value ordering and inference, either to the first solution
//!   or as a lazy iterator over all of them.
//! - [`tree_csp_solver`]: linear-time solver for forest-shaped problems.
//! - [`naive_cycle_cutset`]: conditions on a cutset so the remainder is a
//!   forest.
//!
//! # References
//!
//! - Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//!   Constraint Satisfaction Problems" (forward checking, MRV)
//! - Sabin & Freuder (1994), "Contradicting Conventional Wisdom in
//!   Constraint Satisfaction" (MAC)
//! - Dechter & Pearl (1987), "Network-Based Heuristics for
//!   Constraint-Satisfaction Problems" (tree solving, cutset conditioning)

mod config;
mod cutset;
mod heuristics;
mod runner;
mod tree;

pub use config::BacktrackingConfig;
pub use cutset::naive_cycle_cutset;
pub use heuristics::{forward_check, Inference, ValueOrdering, VariableSelection};
pub use runner::{BacktrackingResult, BacktrackingRunner, Solutions};
pub use tree::tree_csp_solver;
