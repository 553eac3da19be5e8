//! PC2 path consistency.

use std::collections::HashMap;

use log::{debug, trace};

use super::{candidates, has_viable_value, is_viable, project_domains, supports, Worklist};
use crate::model::{ConsistencyTable, ConstraintProblem, Value, VariableId};

type Pair = (VariableId, VariableId);

/// Makes every constrained pair of variables path consistent with every
/// third variable.
///
/// For each pair `(x, y)` sharing a constraint, a value pair `(a, b)`
/// survives only if every other variable keeps a consistent value when
/// `x = a` and `y = b`. Tightened pair relations are recorded on the
/// constraints spanning the pair, so later queries and searches see them.
/// Finally every domain is reduced to its consistent values.
pub fn pc2<V: Value>(problem: &mut ConstraintProblem<V>) -> bool {
    let variables: Vec<VariableId> = problem.variables().collect();
    let mut triples: Worklist<(VariableId, VariableId, VariableId)> = Worklist::new();
    for &x in &variables {
        for &y in problem.neighbors(x).iter().filter(|&&y| x < y) {
            for &k in &variables {
                if k != x && k != y {
                    triples.push((x, k, y));
                }
            }
        }
    }
    debug!("pc2: {} triples in initial worklist", triples.len());

    let mut relations: HashMap<Pair, ConsistencyTable<V>> = HashMap::new();
    while let Some((x, k, y)) = triples.pop() {
        let view: &ConstraintProblem<V> = problem;
        let relation = relations
            .entry((x, y))
            .or_insert_with(|| initial_relation(view, x, y));
        let before = relation.len();
        relation.retain(|pair| has_viable_value(view, k, &[(x, &pair[0]), (y, &pair[1])]));
        if relation.len() == before {
            continue;
        }
        trace!(
            "pc2: ({x}, {y}) relation shrinks to {} pairs through {k}",
            relation.len()
        );

        let table = relation.clone();
        for c in problem.shared_constraints(x, y) {
            problem.record_table(c, vec![x, y], table.clone());
        }
        for &l in &variables {
            if l == x || l == y {
                continue;
            }
            if problem.neighbors(l).contains(&x) {
                let (p, q) = ordered(l, x);
                triples.push((p, y, q));
            }
            if problem.neighbors(l).contains(&y) {
                let (p, q) = ordered(l, y);
                triples.push((p, x, q));
            }
        }
    }

    project_domains(problem);
    is_viable(problem)
}

/// Candidate pairs of `(x, y)` accepted by the constraints they share.
fn initial_relation<V: Value>(
    problem: &ConstraintProblem<V>,
    x: VariableId,
    y: VariableId,
) -> ConsistencyTable<V> {
    let shared = problem.shared_constraints(x, y);
    let ys = candidates(problem, y);
    let mut relation = ConsistencyTable::new();
    for a in candidates(problem, x) {
        for b in &ys {
            if supports(problem, (x, &a), (y, b), &shared) {
                relation.insert(vec![a.clone(), b.clone()]);
            }
        }
    }
    relation
}

fn ordered(a: VariableId, b: VariableId) -> Pair {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
