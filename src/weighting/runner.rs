//! Constraint weighting (breakout) execution loop.

use std::collections::HashSet;

use log::{debug, trace};

use super::config::WeightingConfig;
use crate::error::{CspError, Result};
use crate::local::{read_only_set, LocalSearchResult};
use crate::model::{ActionHistory, Assignment, ConstraintId, ConstraintProblem, Value, VariableId};
use crate::random::create_rng;

/// Constraint weighting runner.
///
/// Every constraint carries a weight, initially 1. Each step evaluates
/// every reassignment of every free variable and commits the one that
/// reduces the total weight of unsatisfied constraints the most; the weights
/// of the constraints still unsatisfied then grow by one. A try ends when no
/// move reduces the weighted violation, and the next try starts from a fresh
/// random assignment with the weights learned so far.
///
/// Without a solution, the end state of the try with the fewest unsatisfied
/// constraints is installed; the earliest such try wins ties.
pub struct WeightingRunner;

impl WeightingRunner {
    /// Runs constraint weighting on `problem`, leaving the first solution
    /// found or the best try's complete assignment installed.
    ///
    /// # Errors
    ///
    /// [`CspError::InvalidConfig`] if the config does not validate.
    pub fn run<V: Value>(
        problem: &mut ConstraintProblem<V>,
        config: &WeightingConfig,
    ) -> Result<LocalSearchResult<V>> {
        config.validate().map_err(CspError::InvalidConfig)?;
        let read_only = read_only_set(problem, &config.read_only);
        let mut rng = create_rng(config.seed);
        let mut history = ActionHistory::new(config.with_history);
        let mut weights = vec![1u64; problem.constraint_count()];
        let mut best: Option<(usize, Assignment<V>)> = None;
        let mut steps = 0;

        for attempt in 0..config.max_tries {
            for (id, value) in problem.assign_randomly(&read_only, &mut rng) {
                history.assigned(id, &value);
            }
            loop {
                if problem.is_completely_consistently_assigned() {
                    debug!("weighting: solved in try {} after {steps} steps", attempt + 1);
                    return Ok(LocalSearchResult {
                        solved: true,
                        conflicts: 0,
                        steps,
                        history: history.into_actions(),
                    });
                }
                let improving = best_move(problem, &weights, &read_only).filter(|m| m.0 > 0);
                let stuck = improving.is_none();
                if let Some((reduction, variable, value)) = improving {
                    trace!("weighting: {variable} = {value:?} reduces the weight by {reduction}");
                    problem.unassign(variable);
                    history.unassigned(variable);
                    problem.assign(variable, value.clone())?;
                    history.assigned(variable, &value);
                    steps += 1;
                }
                for c in problem.unsatisfied_constraints() {
                    weights[c.index()] += 1;
                }
                if stuck {
                    break;
                }
            }

            let conflicts = problem.conflict_count();
            debug!("weighting: try {} ends with {conflicts} conflicts", attempt + 1);
            if best.as_ref().map_or(true, |(fewest, _)| conflicts < *fewest) {
                best = Some((conflicts, problem.current_assignment()));
            }
            if attempt + 1 < config.max_tries {
                for id in problem.variables().filter(|id| !read_only.contains(id)) {
                    history.unassigned(id);
                }
                problem.unassign_all_except(&read_only);
            }
        }

        if let Some((_, state)) = &best {
            problem.assign_from(state)?;
        }
        Ok(LocalSearchResult {
            solved: false,
            conflicts: problem.conflict_count(),
            steps,
            history: history.into_actions(),
        })
    }
}

/// The reassignment with the largest drop in weighted violation, as
/// `(reduction, variable, value)`. The first one found wins ties.
fn best_move<V: Value>(
    problem: &ConstraintProblem<V>,
    weights: &[u64],
    read_only: &HashSet<VariableId>,
) -> Option<(i64, VariableId, V)> {
    let weight_of = |constraints: &[ConstraintId]| -> i64 {
        constraints.iter().map(|c| weights[c.index()] as i64).sum()
    };
    let mut best: Option<(i64, VariableId, V)> = None;
    for variable in problem.variables().filter(|id| !read_only.contains(id)) {
        let current: Vec<_> = problem
            .constraints_containing(variable)
            .iter()
            .copied()
            .filter(|&c| !problem.is_constraint_satisfied(c))
            .collect();
        let before = weight_of(&current);
        for value in problem.domain(variable) {
            if problem.value(variable) == Some(value) {
                continue;
            }
            let after = weight_of(&problem.conflicting_constraints_with(variable, value));
            let reduction = before - after;
            if best.as_ref().map_or(true, |(r, _, _)| reduction > *r) {
                best = Some((reduction, variable, value.clone()));
            }
        }
    }
    best
}
