//! Domain-agnostic finite-domain constraint satisfaction engine.
//!
//! Model a problem once as variables with finite domains and constraints
//! over them, then hand it to any of the algorithms:
//!
//! - **Model**: [`ConstraintProblem`](model::ConstraintProblem) owns the
//!   variables and constraints, with consistency queries and
//!   assign/unassign operations. Predicate constructors live in
//!   [`model::evaluators`].
//! - **Propagation**: AC-3, AC-4, PC-2 and i-consistency domain filtering.
//! - **Systematic search**: backtracking with pluggable variable selection,
//!   value ordering and inference, lazy enumeration of every solution, the
//!   tree-structured solver and cycle-cutset conditioning.
//! - **Local search**: min-conflicts with a tabu list, constraint weighting,
//!   random-restart hill climbing, simulated annealing and genetic local
//!   search, including grid-specialised strategies.
//!
//! # Architecture
//!
//! Variables live in an arena owned by the problem and are referred to by
//! [`VariableId`](model::VariableId). Every algorithm borrows the problem
//! mutably for the duration of the call and leaves its result installed as
//! the current assignment. Stochastic algorithms take an optional seed.
//!
//! # Example
//!
//! ```
//! use u_csp::model::{evaluators, ConstraintProblem};
//! use u_csp::search::{BacktrackingConfig, BacktrackingRunner};
//!
//! let mut problem = ConstraintProblem::new();
//! let ids = problem
//!     .add_named_variables(["wa", "nt", "sa"], ["red", "green", "blue"])
//!     .unwrap();
//! for (a, b) in [(0, 1), (0, 2), (1, 2)] {
//!     problem
//!         .add_constraint([ids[a], ids[b]], evaluators::all_different())
//!         .unwrap();
//! }
//!
//! let result = BacktrackingRunner::run(&mut problem, &BacktrackingConfig::heuristic()).unwrap();
//! assert!(result.solved);
//! ```

pub mod error;
pub mod ga;
pub mod grid;
pub mod hill_climbing;
pub mod local;
pub mod min_conflicts;
pub mod model;
pub mod propagation;
mod random;
pub mod sa;
pub mod search;
pub mod weighting;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::{CspError, Result, VariableError};
