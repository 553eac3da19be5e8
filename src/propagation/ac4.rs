//! AC4 arc consistency with support counters.

use std::collections::{HashMap, VecDeque};

use log::{debug, trace};

use super::{candidates, is_viable, supports};
use crate::model::{ConstraintProblem, Value, VariableId};

/// Arc consistency by support counting.
///
/// For every unassigned `x`, neighbor `y` and value `a` of `x`, counts the
/// candidates of `y` supporting `a` under the constraints the pair shares.
/// A value whose count drops to zero is removed and its own support is
/// withdrawn from the values it supported. Reaches the same domains and
/// outcome as [`ac3`](super::ac3).
pub fn ac4<V: Value>(problem: &mut ConstraintProblem<V>) -> bool {
    let mut counters: HashMap<(VariableId, V, VariableId), usize> = HashMap::new();
    let mut supported_by: HashMap<(VariableId, V), Vec<(VariableId, V)>> = HashMap::new();
    let mut removed: VecDeque<(VariableId, V)> = VecDeque::new();

    for x in problem.unassigned_variables() {
        let neighbors: Vec<VariableId> = problem.neighbors(x).iter().copied().collect();
        for y in neighbors {
            let shared = problem.shared_constraints(x, y);
            let support = candidates(problem, y);
            for a in problem.domain(x).to_vec() {
                let mut count = 0;
                for b in &support {
                    if supports(problem, (x, &a), (y, b), &shared) {
                        count += 1;
                        supported_by
                            .entry((y, b.clone()))
                            .or_default()
                            .push((x, a.clone()));
                    }
                }
                if count > 0 {
                    counters.insert((x, a, y), count);
                } else if problem.prune(x, &a) {
                    trace!("ac4: {x} loses {a:?} (no support in {y})");
                    removed.push_back((x, a));
                }
            }
        }
    }
    debug!(
        "ac4: {} counters, {} values removed during initialization",
        counters.len(),
        removed.len()
    );

    while let Some((y, b)) = removed.pop_front() {
        let Some(dependents) = supported_by.remove(&(y, b)) else {
            continue;
        };
        for (x, a) in dependents {
            if !problem.domain(x).contains(&a) {
                continue;
            }
            let Some(count) = counters.get_mut(&(x, a.clone(), y)) else {
                continue;
            };
            *count -= 1;
            if *count == 0 {
                trace!("ac4: {x} loses {a:?} (support in {y} exhausted)");
                problem.prune(x, &a);
                removed.push_back((x, a));
            }
        }
    }

    is_viable(problem)
}
