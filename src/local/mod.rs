//! Shared pieces of the stochastic local searches.
//!
//! Every local search works on complete, possibly inconsistent assignments.
//! Variables assigned on entry, plus any the caller marks read-only, are
//! never reassigned.

mod types;

pub use types::{GridSwap, LocalSearchProblem, RandomReassignment};
pub(crate) use types::{random_completion, read_only_set, reassign_randomly};

use crate::model::Action;

/// Outcome of a conflict-driven search ([min-conflicts](crate::min_conflicts)
/// or [constraint weighting](crate::weighting)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSearchResult<V> {
    /// Whether the installed assignment satisfies every constraint.
    pub solved: bool,

    /// Unsatisfied constraints under the installed assignment.
    pub conflicts: usize,

    /// Reassignments performed.
    pub steps: usize,

    /// Every assign and unassign made during the search. Empty unless the
    /// config enables history.
    pub history: Vec<Action<V>>,
}
