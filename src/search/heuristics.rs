//! Variable selection, value ordering and inference for backtracking.

use std::cmp::Reverse;

use crate::model::{ConstraintProblem, Value, VariableId};
use crate::propagation::ac3_after;

/// How the next variable to branch on is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableSelection {
    /// The unassigned variable added to the problem first.
    #[default]
    FirstUnassigned,
    /// The variables with the fewest consistent values (MRV).
    MinimumRemainingValues,
    /// The variables with the most unassigned neighbors.
    Degree,
}

impl VariableSelection {
    /// Narrows `candidates` to the ones this rule ranks best, keeping their
    /// order. Never returns an empty set for non-empty input.
    pub(crate) fn best<V: Value>(
        self,
        problem: &ConstraintProblem<V>,
        candidates: &[VariableId],
    ) -> Vec<VariableId> {
        match self {
            VariableSelection::FirstUnassigned => candidates.iter().copied().take(1).collect(),
            VariableSelection::MinimumRemainingValues => best_by_key(candidates, |&id| {
                problem.consistent_domain(id).len()
            }),
            VariableSelection::Degree => best_by_key(candidates, |&id| {
                Reverse(problem.unassigned_neighbors(id).len())
            }),
        }
    }
}

/// All candidates sharing the minimal key.
fn best_by_key<K: Ord>(
    candidates: &[VariableId],
    key: impl Fn(&VariableId) -> K,
) -> Vec<VariableId> {
    let keyed: Vec<(K, VariableId)> = candidates.iter().map(|id| (key(id), *id)).collect();
    let Some(min) = keyed.iter().map(|(k, _)| k).min() else {
        return Vec::new();
    };
    keyed
        .iter()
        .filter(|(k, _)| k == min)
        .map(|&(_, id)| id)
        .collect()
}

/// Order in which the values of the chosen variable are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueOrdering {
    /// The variable's domain, as stored.
    #[default]
    DomainOrder,
    /// Consistent values first by how many choices they leave to the
    /// unassigned neighbors, most first.
    LeastConstrainingValue,
}

impl ValueOrdering {
    pub(crate) fn order<V: Value>(self, problem: &ConstraintProblem<V>, id: VariableId) -> Vec<V> {
        match self {
            ValueOrdering::DomainOrder => problem.domain(id).to_vec(),
            ValueOrdering::LeastConstrainingValue => {
                let neighbors = problem.unassigned_neighbors(id);
                let mut values: Vec<(usize, V)> = problem
                    .consistent_domain(id)
                    .into_iter()
                    .map(|value| {
                        let left: usize = neighbors
                            .iter()
                            .map(|&n| problem.consistent_domain_with(n, &[(id, &value)]).len())
                            .sum();
                        (left, value)
                    })
                    .collect();
                values.sort_by_key(|(left, _)| Reverse(*left));
                values.into_iter().map(|(_, value)| value).collect()
            }
        }
    }
}

/// Reasoning applied right after each tentative assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Inference {
    /// Only the constraints of the assigned variable are checked.
    #[default]
    None,
    /// Fail as soon as an unassigned neighbor has no consistent value left.
    ForwardChecking,
    /// Maintain arc consistency from the assigned variable (MAC). Prunes
    /// domains; the search restores them when the value is undone.
    ArcConsistency,
}

impl Inference {
    /// Whether this inference may change domains.
    pub(crate) fn prunes(self) -> bool {
        matches!(self, Inference::ArcConsistency)
    }

    /// Runs the inference for the just-assigned `id`. `false` means the
    /// assignment cannot lead to a solution.
    pub(crate) fn apply<V: Value>(self, problem: &mut ConstraintProblem<V>, id: VariableId) -> bool {
        match self {
            Inference::None => true,
            Inference::ForwardChecking => forward_check(problem, id),
            Inference::ArcConsistency => ac3_after(problem, id),
        }
    }
}

/// Whether every unassigned neighbor of `id` still has a consistent value.
pub fn forward_check<V: Value>(problem: &ConstraintProblem<V>, id: VariableId) -> bool {
    problem
        .unassigned_neighbors(id)
        .into_iter()
        .all(|n| !problem.consistent_domain(n).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::map_coloring;

    #[test]
    fn test_mrv_prefers_most_constrained() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        p.assign(names["wa"], "red").unwrap();
        p.assign(names["nt"], "green").unwrap();
        let candidates = p.unassigned_variables();
        let best = VariableSelection::MinimumRemainingValues.best(&p, &candidates);
        assert_eq!(best, vec![names["sa"]]);
    }

    #[test]
    fn test_degree_prefers_most_unassigned_neighbors() {
        let (p, names) = map_coloring(&["red", "green", "blue"]);
        let candidates = p.unassigned_variables();
        let best = VariableSelection::Degree.best(&p, &candidates);
        assert_eq!(best, vec![names["sa"]]);
    }

    #[test]
    fn test_first_unassigned() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        p.assign(names["wa"], "red").unwrap();
        let candidates = p.unassigned_variables();
        let best = VariableSelection::FirstUnassigned.best(&p, &candidates);
        assert_eq!(best, vec![names["nt"]]);
    }

    #[test]
    fn test_least_constraining_value_orders_by_remaining_choices() {
        let mut p = ConstraintProblem::new();
        let x = p.add_variable(crate::model::Variable::new([1, 2, 3]));
        let y = p.add_variable(crate::model::Variable::new([1, 2, 3]));
        p.add_constraint([x, y], |v: &[i32]| v.len() < 2 || v[0] < v[1])
            .unwrap();
        // x = 1 leaves y two values, x = 2 one, x = 3 none
        assert_eq!(ValueOrdering::LeastConstrainingValue.order(&p, x), vec![1, 2, 3]);
        assert_eq!(ValueOrdering::LeastConstrainingValue.order(&p, y), vec![3, 2, 1]);
        assert_eq!(ValueOrdering::DomainOrder.order(&p, y), vec![1, 2, 3]);
    }

    #[test]
    fn test_forward_check_detects_wipeout() {
        let (mut p, names) = map_coloring(&["red", "green"]);
        p.assign(names["wa"], "red").unwrap();
        p.assign(names["nt"], "green").unwrap();
        assert!(!forward_check(&p, names["nt"]), "sa has no color left");
        assert!(Inference::None.apply(&mut p, names["nt"]));
    }
}
