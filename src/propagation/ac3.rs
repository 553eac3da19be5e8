//! AC3 arc consistency.

use log::{debug, trace};

use super::{candidates, is_viable, supports, Worklist};
use crate::model::{ConstraintProblem, Value, VariableId};

/// Makes every unassigned variable arc consistent with all of its neighbors.
///
/// Runs to the fixpoint and returns whether every variable still has a
/// consistent value.
///
/// # Examples
///
/// ```
/// use u_csp::model::{ConstraintProblem, Variable};
/// use u_csp::propagation::ac3;
///
/// let mut problem = ConstraintProblem::new();
/// let x = problem.add_variable(Variable::new([1, 2, 3]));
/// let y = problem.add_variable(Variable::new([1, 2, 3]));
/// problem
///     .add_constraint([x, y], |v: &[i32]| v.len() < 2 || v[0] < v[1])
///     .unwrap();
///
/// assert!(ac3(&mut problem));
/// assert_eq!(problem.domain(x), &[1, 2]);
/// assert_eq!(problem.domain(y), &[2, 3]);
/// ```
pub fn ac3<V: Value>(problem: &mut ConstraintProblem<V>) -> bool {
    let view: &ConstraintProblem<V> = problem;
    let arcs: Worklist<(VariableId, VariableId)> = view
        .unassigned_variables()
        .into_iter()
        .flat_map(move |x| view.neighbors(x).iter().map(move |&y| (x, y)))
        .collect();
    run(problem, arcs)
}

/// Restores arc consistency after `assigned` received a value.
///
/// Only the arcs from `assigned`'s unassigned neighbors into it start in the
/// worklist; used to maintain arc consistency during search.
pub fn ac3_after<V: Value>(problem: &mut ConstraintProblem<V>, assigned: VariableId) -> bool {
    let arcs: Worklist<(VariableId, VariableId)> = problem
        .unassigned_neighbors(assigned)
        .into_iter()
        .map(|n| (n, assigned))
        .collect();
    run(problem, arcs)
}

fn run<V: Value>(
    problem: &mut ConstraintProblem<V>,
    mut arcs: Worklist<(VariableId, VariableId)>,
) -> bool {
    debug!("ac3: {} arcs in initial worklist", arcs.len());
    while let Some((x, y)) = arcs.pop() {
        if problem.is_assigned(x) || !revise(problem, x, y) {
            continue;
        }
        let next: Vec<VariableId> = problem
            .neighbors(x)
            .iter()
            .copied()
            .filter(|&z| z != y && !problem.is_assigned(z))
            .collect();
        for z in next {
            arcs.push((z, x));
        }
    }
    is_viable(problem)
}

/// Removes the values of `x` without support in `y`. Returns whether any
/// value was removed.
fn revise<V: Value>(problem: &mut ConstraintProblem<V>, x: VariableId, y: VariableId) -> bool {
    let view: &ConstraintProblem<V> = problem;
    let shared = view.shared_constraints(x, y);
    let support = candidates(view, y);
    let unsupported: Vec<V> = view
        .domain(x)
        .iter()
        .filter(|&a| !support.iter().any(|b| supports(view, (x, a), (y, b), &shared)))
        .cloned()
        .collect();
    for value in &unsupported {
        trace!("ac3: {x} loses {value:?} (no support in {y})");
        problem.prune(x, value);
    }
    !unsupported.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{divisor_chain, domain_union, less_than_pair, map_coloring};
    use std::collections::BTreeSet;

    #[test]
    fn test_divisor_chain_drops_five() {
        let (mut p, [x, y, z]) = divisor_chain();
        assert_eq!(domain_union(&p), BTreeSet::from([2, 4, 5]));
        assert!(ac3(&mut p));
        assert_eq!(domain_union(&p), BTreeSet::from([2, 4]));
        assert_eq!(p.domain(x), &[2]);
        assert_eq!(p.domain(y), &[2, 4]);
        assert_eq!(p.domain(z), &[2]);
    }

    #[test]
    fn test_map_coloring_is_arc_consistent() {
        let (mut p, _) = map_coloring(&["red", "green"]);
        assert!(ac3(&mut p));
        assert!(p.variables().all(|id| p.domain(id).len() == 2));
    }

    #[test]
    fn test_less_than_pair() {
        let (mut p, [x, y]) = less_than_pair();
        assert!(ac3(&mut p));
        assert_eq!(p.domain(x), &[1, 2]);
        assert_eq!(p.domain(y), &[2, 3]);
    }

    #[test]
    fn test_assigned_variable_supports_only_its_value() {
        let (mut p, [x, y]) = less_than_pair();
        p.assign(y, 2).unwrap();
        assert!(ac3(&mut p));
        assert_eq!(p.domain(x), &[1]);
        assert_eq!(p.domain(y), &[1, 2, 3], "assigned domains are not revised");
    }

    #[test]
    fn test_wipeout_reports_failure() {
        let (mut p, [x, y]) = less_than_pair();
        p.assign(y, 1).unwrap();
        assert!(!ac3(&mut p));
        assert!(p.domain(x).is_empty());
    }

    #[test]
    fn test_incremental_after_assignment() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        p.assign(names["sa"], "red").unwrap();
        assert!(ac3_after(&mut p, names["sa"]));
        for region in ["wa", "nt", "q", "nsw", "v"] {
            assert!(!p.domain(names[region]).contains(&"red"), "{region}");
        }
        assert_eq!(p.domain(names["t"]).len(), 3);
    }

    #[test]
    fn test_incremental_cascades() {
        let (mut p, names) = map_coloring(&["red", "green"]);
        p.assign(names["sa"], "red").unwrap();
        // wa and nt both collapse to green, which leaves no color between them
        assert!(!ac3_after(&mut p, names["sa"]));
    }
}
