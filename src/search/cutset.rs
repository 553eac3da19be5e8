//! Naive cycle cutset conditioning.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;
use log::{debug, trace};

use super::tree::tree_csp_solver;
use crate::model::{ConstraintId, ConstraintProblem, Value, VariableId};

/// Solves a problem by fixing a cycle cutset and handing the rest to
/// [`tree_csp_solver`].
///
/// Constraints are taken in order of decreasing arity; the cutset for `k` is
/// every variable of the first `k` constraints, for `k` from 1 up to one less
/// than the constraint count. A cutset is used once the variables outside it
/// (and not already assigned) form a non-empty forest. Every assignment of
/// the cutset consistent with the constraints touching it is tried: the
/// other domains are narrowed to their consistent values and the tree solver
/// runs. Failed attempts are undone, values and domains alike.
///
/// The search is incomplete: it returns `false` when no cutset of that shape
/// works even if a solution exists, for example with a single constraint.
pub fn naive_cycle_cutset<V: Value>(problem: &mut ConstraintProblem<V>) -> bool {
    let read_only: HashSet<VariableId> = problem.assigned_variables().into_iter().collect();
    let mut by_arity: Vec<ConstraintId> = problem.constraints().collect();
    by_arity.sort_by_key(|&c| Reverse(problem.constraint(c).arity()));

    for k in 1..by_arity.len() {
        let cutset: BTreeSet<VariableId> = by_arity[..k]
            .iter()
            .flat_map(|&c| problem.constraint(c).variables().iter().copied())
            .collect();
        let rest: BTreeSet<VariableId> = problem
            .variables()
            .filter(|id| !cutset.contains(id) && !read_only.contains(id))
            .collect();
        if rest.is_empty() || !is_forest(problem, &rest) {
            continue;
        }
        debug!("cutset: trying {} variables from the first {k} constraints", cutset.len());
        if solve_with_cutset(problem, &cutset, &rest, &read_only) {
            return true;
        }
    }
    debug!("cutset: no cutset led to a solution");
    false
}

/// Whether the constraint graph restricted to `ids` has no cycle.
fn is_forest<V: Value>(problem: &ConstraintProblem<V>, ids: &BTreeSet<VariableId>) -> bool {
    let mut visited = HashSet::new();
    for &root in ids {
        if !visited.insert(root) {
            continue;
        }
        let mut stack = vec![(root, None)];
        while let Some((u, parent)) = stack.pop() {
            for &n in problem.neighbors(u).iter().filter(|&&n| ids.contains(&n)) {
                if Some(n) == parent {
                    continue;
                }
                if !visited.insert(n) {
                    return false;
                }
                stack.push((n, Some(u)));
            }
        }
    }
    true
}

fn solve_with_cutset<V: Value>(
    problem: &mut ConstraintProblem<V>,
    cutset: &BTreeSet<VariableId>,
    rest: &BTreeSet<VariableId>,
    read_only: &HashSet<VariableId>,
) -> bool {
    let ids: Vec<VariableId> = cutset.iter().copied().collect();
    let choices: Vec<Vec<V>> = ids
        .iter()
        .map(|&id| match problem.value(id) {
            Some(value) if read_only.contains(&id) => vec![value.clone()],
            _ => problem.domain(id).to_vec(),
        })
        .collect();
    let touching: BTreeSet<ConstraintId> = ids
        .iter()
        .flat_map(|&id| problem.constraints_containing(id).iter().copied())
        .collect();

    for values in choices.iter().map(|c| c.iter()).multi_cartesian_product() {
        let trial: Vec<(VariableId, &V)> = ids.iter().copied().zip(values.iter().copied()).collect();
        if !touching
            .iter()
            .all(|&c| problem.is_constraint_consistent_with(c, &trial))
        {
            continue;
        }

        let fixed: Vec<VariableId> = ids.iter().copied().filter(|id| !read_only.contains(id)).collect();
        for (&id, value) in ids.iter().zip(&values) {
            if !read_only.contains(&id) && problem.assign(id, (*value).clone()).is_err() {
                trace!("cutset: {value:?} left the domain of {id}");
            }
        }
        let saved = problem.snapshot_domains(rest.iter().copied());
        let narrowed = rest.iter().all(|&id| {
            let keep = problem.consistent_domain(id);
            problem.retain_domain(id, |value| keep.contains(value));
            !problem.domain(id).is_empty()
        });
        if narrowed && tree_csp_solver(problem) {
            debug!("cutset: solved with {values:?} on the cutset");
            return true;
        }
        problem.restore_domains(saved);
        for id in fixed {
            problem.unassign(id);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{less_than_pair, map_coloring};

    #[test]
    fn test_solves_map_coloring() {
        let (mut p, _) = map_coloring(&["red", "green", "blue"]);
        assert!(naive_cycle_cutset(&mut p));
        assert!(p.is_completely_consistently_assigned());
    }

    #[test]
    fn test_failure_restores_problem() {
        let (mut p, _) = map_coloring(&["red", "green"]);
        assert!(!naive_cycle_cutset(&mut p));
        assert!(p.is_completely_unassigned());
        assert!(p.variables().all(|id| p.domain(id).len() == 2));
    }

    #[test]
    fn test_keeps_preassigned_values() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        p.assign(names["nsw"], "blue").unwrap();
        assert!(naive_cycle_cutset(&mut p));
        assert!(p.is_completely_consistently_assigned());
        assert_eq!(p.value(names["nsw"]), Some(&"blue"));
    }

    #[test]
    fn test_incomplete_with_single_constraint() {
        let (mut p, _) = less_than_pair();
        assert!(!naive_cycle_cutset(&mut p));
        assert!(p.is_completely_unassigned());
    }

    #[test]
    fn test_forest_check() {
        let (p, names) = map_coloring(&["red", "green", "blue"]);
        let all: BTreeSet<VariableId> = p.variables().collect();
        assert!(!is_forest(&p, &all));
        let without_sa: BTreeSet<VariableId> = all.iter().copied().filter(|&id| id != names["sa"]).collect();
        assert!(is_forest(&p, &without_sa));
    }
}
