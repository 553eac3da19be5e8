//! Consistency propagation.
//!
//! Every algorithm here filters domains in place and reports whether the
//! problem may still have a solution: `false` means some variable ended with
//! an empty domain or with no value consistent with the current assignment.
//! Assigned variables are never revised; they support their neighbors only
//! through their current value.
//!
//! # References
//!
//! - Mackworth (1977), "Consistency in Networks of Relations" (AC3, PC2)
//! - Mohr & Henderson (1986), "Arc and Path Consistency Revisited" (AC4)
//! - Freuder (1978), "Synthesizing Constraint Expressions" (i-consistency)

mod ac3;
mod ac4;
mod i_consistency;
mod pc2;

pub use ac3::{ac3, ac3_after};
pub use ac4::ac4;
pub use i_consistency::{i_consistency, IConsistency};
pub use pc2::pc2;

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use log::debug;

use crate::model::{ConstraintId, ConstraintProblem, Value, VariableId};

/// FIFO worklist that ignores items already waiting in it.
pub(crate) struct Worklist<T> {
    queue: VecDeque<T>,
    queued: HashSet<T>,
}

impl<T: Copy + Eq + Hash> Worklist<T> {
    pub(crate) fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
        }
    }

    pub(crate) fn push(&mut self, item: T) {
        if self.queued.insert(item) {
            self.queue.push_back(item);
        }
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        let item = self.queue.pop_front()?;
        self.queued.remove(&item);
        Some(item)
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}

impl<T: Copy + Eq + Hash> FromIterator<T> for Worklist<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut worklist = Self::new();
        for item in iter {
            worklist.push(item);
        }
        worklist
    }
}

/// Values `id` can still take: its current value if assigned, else its domain.
pub(crate) fn candidates<V: Value>(problem: &ConstraintProblem<V>, id: VariableId) -> Vec<V> {
    match problem.value(id) {
        Some(value) => vec![value.clone()],
        None => problem.domain(id).to_vec(),
    }
}

/// Whether `y = b` supports `x = a` under every constraint they share.
pub(crate) fn supports<V: Value>(
    problem: &ConstraintProblem<V>,
    (x, a): (VariableId, &V),
    (y, b): (VariableId, &V),
    shared: &[ConstraintId],
) -> bool {
    let trial = [(x, a), (y, b)];
    shared
        .iter()
        .all(|&c| problem.is_constraint_consistent_with(c, &trial))
}

/// Whether `id` keeps at least one candidate consistent with `trial`.
pub(crate) fn has_viable_value<V: Value>(
    problem: &ConstraintProblem<V>,
    id: VariableId,
    trial: &[(VariableId, &V)],
) -> bool {
    match problem.value(id) {
        Some(value) => problem.accepts_value_with(id, value, trial),
        None => problem
            .domain(id)
            .iter()
            .any(|value| problem.accepts_value_with(id, value, trial)),
    }
}

/// Removes from every unassigned domain the values outside its consistent
/// domain.
pub(crate) fn project_domains<V: Value>(problem: &mut ConstraintProblem<V>) {
    for id in problem.unassigned_variables() {
        let keep = problem.consistent_domain(id);
        problem.retain_domain(id, |value| keep.contains(value));
    }
}

/// Whether every variable has a non-empty domain and a non-empty
/// consistent domain.
pub(crate) fn is_viable<V: Value>(problem: &ConstraintProblem<V>) -> bool {
    problem.variables().all(|id| {
        let viable = !problem.domain(id).is_empty() && !problem.consistent_domain(id).is_empty();
        if !viable {
            debug!("variable {id} has no consistent value left");
        }
        viable
    })
}
