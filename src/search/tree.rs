//! Tree-structured CSP solver.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, trace};

use crate::model::{ConstraintProblem, Value, VariableId};
use crate::propagation::supports;

/// Solves a problem whose unassigned variables form a forest in the
/// constraint graph, in time linear in the number of variables.
///
/// Each component is oriented by a breadth-first search from its first
/// variable and the orientation is sorted topologically. Any edge outside
/// the search trees is oriented both ways, so a cycle leaves variables the
/// sort never reaches; the solver then fails without touching the problem.
///
/// Otherwise every unassigned domain is reduced to its consistent values,
/// each parent is made arc consistent with its children from the leaves up,
/// and values are assigned from the roots down. Domains stay reduced when
/// the solver fails afterwards; assignments it made are undone.
pub fn tree_csp_solver<V: Value>(problem: &mut ConstraintProblem<V>) -> bool {
    let unassigned = problem.unassigned_variables();
    if unassigned.is_empty() {
        return problem.is_completely_consistently_assigned();
    }

    let parents = orient(problem, &unassigned);
    let Some(order) = topological_order(problem, &unassigned, &parents) else {
        debug!("tree solver: the unassigned variables contain a cycle");
        return false;
    };

    for &id in &order {
        let keep = problem.consistent_domain(id);
        problem.retain_domain(id, |value| keep.contains(value));
        if problem.domain(id).is_empty() {
            trace!("tree solver: {id} has no consistent value");
            return false;
        }
    }

    for &child in order.iter().rev() {
        let Some(&parent) = parents.get(&child) else {
            continue;
        };
        let view: &ConstraintProblem<V> = problem;
        let shared = view.shared_constraints(parent, child);
        let supported: Vec<V> = view
            .domain(parent)
            .iter()
            .filter(|&a| {
                view.domain(child)
                    .iter()
                    .any(|b| supports(view, (parent, a), (child, b), &shared))
            })
            .cloned()
            .collect();
        problem.retain_domain(parent, |value| supported.contains(value));
        if problem.domain(parent).is_empty() {
            trace!("tree solver: {parent} has no value supported by {child}");
            return false;
        }
    }

    let mut assigned = Vec::with_capacity(order.len());
    for &id in &order {
        let value = problem.consistent_domain(id).into_iter().next();
        match value.map(|value| problem.assign(id, value)) {
            Some(Ok(())) => assigned.push(id),
            _ => {
                trace!("tree solver: no value left for {id}");
                undo(problem, &assigned);
                return false;
            }
        }
    }
    if !problem.is_completely_consistently_assigned() {
        undo(problem, &assigned);
        return false;
    }
    debug!("tree solver: assigned {} variables", assigned.len());
    true
}

/// Breadth-first parent of every non-root variable in `ids`, over the edges
/// between unassigned variables.
fn orient<V: Value>(
    problem: &ConstraintProblem<V>,
    ids: &[VariableId],
) -> HashMap<VariableId, VariableId> {
    let members: HashSet<VariableId> = ids.iter().copied().collect();
    let mut parents = HashMap::new();
    let mut visited = HashSet::new();
    for &root in ids {
        if !visited.insert(root) {
            continue;
        }
        let mut queue = VecDeque::from([root]);
        while let Some(u) = queue.pop_front() {
            for &n in problem.neighbors(u) {
                if members.contains(&n) && visited.insert(n) {
                    parents.insert(n, u);
                    queue.push_back(n);
                }
            }
        }
    }
    parents
}

/// Kahn's sort of the orientation; `None` if some variable is never freed.
fn topological_order<V: Value>(
    problem: &ConstraintProblem<V>,
    ids: &[VariableId],
    parents: &HashMap<VariableId, VariableId>,
) -> Option<Vec<VariableId>> {
    let members: HashSet<VariableId> = ids.iter().copied().collect();
    let mut successors: HashMap<VariableId, Vec<VariableId>> = HashMap::new();
    let mut in_degree: HashMap<VariableId, usize> = ids.iter().map(|&id| (id, 0)).collect();
    let mut edge = |from: VariableId, to: VariableId| {
        successors.entry(from).or_default().push(to);
        *in_degree.entry(to).or_default() += 1;
    };
    for &u in ids {
        for &n in problem.neighbors(u).iter().filter(|&&n| u < n && members.contains(&n)) {
            if parents.get(&n) == Some(&u) {
                edge(u, n);
            } else if parents.get(&u) == Some(&n) {
                edge(n, u);
            } else {
                edge(u, n);
                edge(n, u);
            }
        }
    }

    let mut ready: VecDeque<VariableId> = ids.iter().copied().filter(|id| in_degree[id] == 0).collect();
    let mut order = Vec::with_capacity(ids.len());
    while let Some(u) = ready.pop_front() {
        order.push(u);
        for &v in successors.get(&u).into_iter().flatten() {
            if let Some(d) = in_degree.get_mut(&v) {
                *d -= 1;
                if *d == 0 {
                    ready.push_back(v);
                }
            }
        }
    }
    (order.len() == ids.len()).then_some(order)
}

fn undo<V: Value>(problem: &mut ConstraintProblem<V>, assigned: &[VariableId]) {
    for &id in assigned {
        problem.unassign(id);
    }
}
