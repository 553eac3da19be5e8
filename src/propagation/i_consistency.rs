//! Generalized i-consistency.

use std::collections::BTreeSet;

use itertools::Itertools;
use log::{debug, trace};

use super::{candidates, is_viable, project_domains};
use crate::error::{CspError, Result};
use crate::model::{evaluators, ConsistencyTable, ConstraintId, ConstraintProblem, Value, VariableId};

/// Outcome of an [`i_consistency`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IConsistency {
    /// Whether every variable kept a consistent value.
    pub consistent: bool,
    /// Auxiliary constraints created to hold tables over variable sets that
    /// no existing constraint spans.
    pub added_constraints: Vec<ConstraintId>,
}

/// Enforces consistency over every set of `i` variables.
///
/// For each set, the joint assignments of the set's candidates are
/// enumerated and those rejected by any constraint touching the set are
/// dropped. A reduced table is recorded on every constraint spanning the set,
/// or on a new auxiliary constraint when none does; recorded tables then
/// restrict later evaluations. Passes repeat until no table shrinks, after
/// which domains are reduced to their consistent values.
///
/// The work grows with `C(n, i)` times the product of `i` domain sizes.
///
/// # Errors
///
/// [`CspError::InvalidConsistencyLevel`] unless `0 < i <= variable count`;
/// nothing is touched in that case.
pub fn i_consistency<V: Value>(problem: &mut ConstraintProblem<V>, i: usize) -> Result<IConsistency> {
    let variable_count = problem.variable_count();
    if i == 0 || i > variable_count {
        return Err(CspError::InvalidConsistencyLevel {
            level: i,
            variable_count,
        });
    }

    let view: &ConstraintProblem<V> = problem;
    let mut tables: Vec<(Vec<VariableId>, ConsistencyTable<V>)> = view
        .variables()
        .combinations(i)
        .map(|scope| {
            let table = scope
                .iter()
                .map(|&id| candidates(view, id))
                .multi_cartesian_product()
                .collect();
            (scope, table)
        })
        .collect();
    debug!("i-consistency({i}): {} variable sets", tables.len());

    let mut added_constraints = Vec::new();
    let mut pass = 0;
    loop {
        pass += 1;
        let mut revised = false;
        for (scope, table) in tables.iter_mut() {
            let view: &ConstraintProblem<V> = problem;
            let touching: BTreeSet<ConstraintId> = scope
                .iter()
                .flat_map(|&id| view.constraints_containing(id).iter().copied())
                .collect();
            let before = table.len();
            table.retain(|tuple| {
                let trial: Vec<(VariableId, &V)> = scope.iter().copied().zip(tuple).collect();
                touching
                    .iter()
                    .all(|&c| view.is_constraint_consistent_with(c, &trial))
            });
            if table.len() < before {
                trace!(
                    "i-consistency({i}): {scope:?} keeps {} of {before} assignments",
                    table.len()
                );
                revised = true;
                record(problem, scope, table, &mut added_constraints)?;
            }
        }
        if !revised {
            break;
        }
    }
    debug!(
        "i-consistency({i}): fixpoint after {pass} passes, {} auxiliary constraints",
        added_constraints.len()
    );

    project_domains(problem);
    Ok(IConsistency {
        consistent: is_viable(problem),
        added_constraints,
    })
}

fn record<V: Value>(
    problem: &mut ConstraintProblem<V>,
    scope: &[VariableId],
    table: &ConsistencyTable<V>,
    added: &mut Vec<ConstraintId>,
) -> Result<()> {
    let spanning: Vec<ConstraintId> = problem
        .constraints()
        .filter(|&c| scope.iter().all(|&id| problem.constraint(c).contains(id)))
        .collect();
    if spanning.is_empty() {
        let id = problem.add_constraint(scope.iter().copied(), evaluators::always_satisfied())?;
        debug!("i-consistency: auxiliary constraint {id} over {scope:?}");
        problem.record_table(id, scope.to_vec(), table.clone());
        added.push(id);
    } else {
        for c in spanning {
            problem.record_table(c, scope.to_vec(), table.clone());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Variable;
    use crate::test_fixtures::{less_than_pair, map_coloring};
    use proptest::prelude::*;

    /// Variable count and binary relations over `{0, 1, 2}`, each as two
    /// endpoints (taken modulo the count) and a 3x3 allowed-pair table.
    fn binary_csp() -> impl Strategy<Value = (usize, Vec<(usize, usize, Vec<bool>)>)> {
        (
            3usize..=5,
            prop::collection::vec(
                (0usize..5, 0usize..5, prop::collection::vec(any::<bool>(), 9)),
                1..8,
            ),
        )
    }

    fn build(n: usize, relations: Vec<(usize, usize, Vec<bool>)>) -> (ConstraintProblem<i32>, Vec<VariableId>) {
        let mut p = ConstraintProblem::new();
        let ids: Vec<VariableId> = (0..n).map(|_| p.add_variable(Variable::new([0, 1, 2]))).collect();
        for (a, b, allowed) in relations {
            let (a, b) = (a % n, b % n);
            if a == b {
                continue;
            }
            p.add_constraint([ids[a], ids[b]], move |v: &[i32]| {
                v.len() < 2 || allowed[(v[0] * 3 + v[1]) as usize]
            })
            .unwrap();
        }
        (p, ids)
    }

    #[test]
    fn test_level_must_be_in_range() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        p.assign(names["wa"], "red").unwrap();
        let err = i_consistency(&mut p, 17).unwrap_err();
        assert_eq!(
            err,
            CspError::InvalidConsistencyLevel {
                level: 17,
                variable_count: 7
            }
        );
        assert!(i_consistency(&mut p, 0).is_err());
        assert_eq!(p.constraint_count(), 10, "nothing was added");
    }

    #[test]
    fn test_two_colors_pass_level_two() {
        let (mut p, _) = map_coloring(&["red", "green"]);
        let outcome = i_consistency(&mut p, 2).unwrap();
        assert!(outcome.consistent);
        assert!(outcome.added_constraints.is_empty());
    }

    #[test]
    fn test_two_colors_fail_level_three() {
        let (mut p, _) = map_coloring(&["red", "green"]);
        let outcome = i_consistency(&mut p, 3).unwrap();
        assert!(!outcome.consistent);
        assert!(!outcome.added_constraints.is_empty());
        for &id in &outcome.added_constraints {
            assert_eq!(p.constraint(id).arity(), 3);
        }
    }

    #[test]
    fn test_less_than_pair_level_two() {
        let (mut p, [x, y]) = less_than_pair();
        let outcome = i_consistency(&mut p, 2).unwrap();
        assert!(outcome.consistent);
        assert_eq!(p.domain(x), &[1, 2]);
        assert_eq!(p.domain(y), &[2, 3]);
        let c = p.constraints_containing(x)[0];
        assert_eq!(p.constraint(c).recorded_tables()[&vec![x, y]].len(), 3);
    }

    #[test]
    fn test_level_one_is_node_consistency() {
        let (mut p, [x, y]) = less_than_pair();
        p.assign(x, 3).unwrap();
        let outcome = i_consistency(&mut p, 1).unwrap();
        assert!(!outcome.consistent, "x = 3 leaves y nothing");
        assert!(p.domain(y).is_empty());
    }

    proptest! {
        #[test]
        fn prop_rising_levels_never_grow_domains((n, relations) in binary_csp()) {
            let (mut p, ids) = build(n, relations);
            let mut previous: Vec<Vec<i32>> = ids.iter().map(|&id| p.domain(id).to_vec()).collect();
            for level in 1..=3 {
                i_consistency(&mut p, level).unwrap();
                for (&id, before) in ids.iter().zip(&previous) {
                    prop_assert!(
                        p.domain(id).iter().all(|v| before.contains(v)),
                        "level {} grew {:?} from {:?} to {:?}", level, id, before, p.domain(id)
                    );
                }
                previous = ids.iter().map(|&id| p.domain(id).to_vec()).collect();
            }
        }

        #[test]
        fn prop_higher_level_never_restores_values(colors in 2usize..4, assigned in prop::option::of(0usize..7)) {
            let palette = ["red", "green", "blue"];
            let (mut p, _) = map_coloring(&palette[..colors]);
            if let Some(i) = assigned {
                let id = p.variables().nth(i).unwrap();
                p.assign(id, palette[0]).unwrap();
            }
            i_consistency(&mut p, 1).unwrap();
            let after_one: Vec<Vec<&str>> = p.variables().map(|id| p.domain(id).to_vec()).collect();
            i_consistency(&mut p, 2).unwrap();
            for id in p.variables() {
                for value in p.domain(id) {
                    prop_assert!(after_one[id.index()].contains(value));
                }
            }
        }
    }
}
