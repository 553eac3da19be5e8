//! Min-conflicts execution engine.
//!
//! # Algorithm
//!
//! 1. Assign every free variable a random value
//! 2. At each step:
//!    a. Pick a random free variable of some unsatisfied constraint that is
//!       not in the tabu list (any free conflicted variable if all are)
//!    b. Reassign it to the value leaving the fewest of its constraints
//!       unsatisfied, ties broken at random
//!    c. Push it onto the tabu list and remember the best assignment so far
//! 3. Stop when every constraint holds or the step budget is spent, and
//!    install the best assignment seen
//!
//! # Reference
//!
//! Minton, S., Johnston, M. D., Philips, A. B. & Laird, P. (1992).
//! "Minimizing conflicts: a heuristic repair method for constraint
//! satisfaction and scheduling problems", *Artificial Intelligence* 58, 161-205.

use std::collections::{BTreeSet, HashSet};

use log::{debug, trace};
use rand::seq::IndexedRandom;
use rand::Rng;

use super::config::MinConflictsConfig;
use super::tabu::TabuList;
use crate::error::{CspError, Result};
use crate::local::{read_only_set, LocalSearchResult};
use crate::model::{ActionHistory, ConstraintProblem, Value, VariableId};
use crate::random::create_rng;

/// Min-conflicts runner.
pub struct MinConflictsRunner;

impl MinConflictsRunner {
    /// Runs min-conflicts on `problem` and leaves the best assignment found
    /// installed.
    ///
    /// Restoring the best assignment at the end is not part of the history.
    ///
    /// # Errors
    ///
    /// [`CspError::InvalidConfig`] if the config does not validate, or if
    /// `tabu_size` plus the number of read-only variables is not below the
    /// variable count.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_csp::min_conflicts::{MinConflictsConfig, MinConflictsRunner};
    /// use u_csp::model::{evaluators, ConstraintProblem};
    ///
    /// let mut problem = ConstraintProblem::new();
    /// let ids = problem.add_variables(3, [1, 2, 3]);
    /// problem.add_constraint(ids, evaluators::all_different()).unwrap();
    ///
    /// let config = MinConflictsConfig::default().with_seed(1);
    /// let result = MinConflictsRunner::run(&mut problem, &config).unwrap();
    /// assert!(result.solved);
    /// ```
    pub fn run<V: Value>(
        problem: &mut ConstraintProblem<V>,
        config: &MinConflictsConfig,
    ) -> Result<LocalSearchResult<V>> {
        config.validate().map_err(CspError::InvalidConfig)?;
        let read_only = read_only_set(problem, &config.read_only);
        if config.tabu_size + read_only.len() >= problem.variable_count() {
            return Err(CspError::InvalidConfig(format!(
                "tabu_size {} plus {} read-only variables must stay below {} variables",
                config.tabu_size,
                read_only.len(),
                problem.variable_count()
            )));
        }

        let mut rng = create_rng(config.seed);
        let mut history = ActionHistory::new(config.with_history);
        for (id, value) in problem.assign_randomly(&read_only, &mut rng) {
            history.assigned(id, &value);
        }

        let mut conflicts = problem.conflict_count();
        let mut best = problem.current_assignment();
        let mut best_conflicts = conflicts;
        let mut tabu = TabuList::new(config.tabu_size);
        let mut steps = 0;

        while steps < config.max_steps && conflicts > 0 {
            let Some(variable) = pick_conflicted(problem, &read_only, &tabu, &mut rng) else {
                debug!("min-conflicts: only read-only variables are in conflict");
                break;
            };
            let Some(value) = min_conflicts_value(problem, variable, &mut rng) else {
                break;
            };

            problem.unassign(variable);
            history.unassigned(variable);
            problem.assign(variable, value.clone())?;
            history.assigned(variable, &value);
            tabu.push(variable);
            steps += 1;

            conflicts = problem.conflict_count();
            trace!(
                "min-conflicts: step {steps}: {variable} = {value:?}, {conflicts} conflicts, {} tabu",
                tabu.len()
            );
            if conflicts < best_conflicts {
                best_conflicts = conflicts;
                best = problem.current_assignment();
            }
        }

        if conflicts > best_conflicts {
            problem.assign_from(&best)?;
            conflicts = best_conflicts;
        }
        debug!("min-conflicts: {conflicts} conflicts after {steps} steps");

        Ok(LocalSearchResult {
            solved: problem.is_completely_consistently_assigned(),
            conflicts,
            steps,
            history: history.into_actions(),
        })
    }
}

/// A random free variable of some unsatisfied constraint, preferring ones
/// outside the tabu list.
fn pick_conflicted<V: Value, R: Rng + ?Sized>(
    problem: &ConstraintProblem<V>,
    read_only: &HashSet<VariableId>,
    tabu: &TabuList<VariableId>,
    rng: &mut R,
) -> Option<VariableId> {
    let conflicted: Vec<VariableId> = problem
        .unsatisfied_constraints()
        .into_iter()
        .flat_map(|c| problem.constraint(c).variables().iter().copied())
        .filter(|id| !read_only.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let allowed: Vec<VariableId> = conflicted
        .iter()
        .copied()
        .filter(|id| !tabu.contains(id))
        .collect();
    if allowed.is_empty() {
        conflicted.choose(rng).copied()
    } else {
        allowed.choose(rng).copied()
    }
}

/// A domain value of `variable` with the fewest unsatisfied constraints,
/// chosen at random among ties.
fn min_conflicts_value<V: Value, R: Rng + ?Sized>(
    problem: &ConstraintProblem<V>,
    variable: VariableId,
    rng: &mut R,
) -> Option<V> {
    let scored: Vec<(usize, &V)> = problem
        .domain(variable)
        .iter()
        .map(|value| (problem.conflicts_with(variable, value), value))
        .collect();
    let min = scored.iter().map(|&(c, _)| c).min()?;
    let best: Vec<&V> = scored
        .into_iter()
        .filter(|&(c, _)| c == min)
        .map(|(_, value)| value)
        .collect();
    best.choose(rng).map(|&value| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{map_coloring, n_queens};
    use proptest::prelude::*;

    #[test]
    fn test_solves_eight_queens() {
        let mut p = n_queens(8);
        let config = MinConflictsConfig::default().with_max_steps(2000).with_seed(42);
        let result = MinConflictsRunner::run(&mut p, &config).unwrap();
        if result.solved {
            assert_eq!(result.conflicts, 0);
            assert!(p.is_completely_consistently_assigned());
        } else {
            assert_eq!(result.conflicts, p.conflict_count());
        }
    }

    #[test]
    fn test_solves_map_coloring_with_tabu() {
        let (mut p, _) = map_coloring(&["red", "green", "blue"]);
        let config = MinConflictsConfig::default().with_tabu_size(2).with_seed(7);
        let result = MinConflictsRunner::run(&mut p, &config).unwrap();
        assert!(result.solved);
        assert!(p.is_completely_consistently_assigned());
    }

    #[test]
    fn test_history_starts_with_random_assignment() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        p.assign(names["wa"], "red").unwrap();
        let config = MinConflictsConfig::default().with_history(true).with_seed(3);
        let result = MinConflictsRunner::run(&mut p, &config).unwrap();

        assert!(result.history.len() >= 6);
        assert!(result.history[..6].iter().all(|a| a.value.is_some()));
        assert!(result.history.iter().all(|a| a.variable != names["wa"]));
        assert_eq!(result.history.len(), 6 + 2 * result.steps);
        assert_eq!(p.value(names["wa"]), Some(&"red"));
    }

    #[test]
    fn test_read_only_variables_keep_their_values() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        p.assign(names["sa"], "green").unwrap();
        let config = MinConflictsConfig::default()
            .with_read_only([names["sa"]])
            .with_seed(9);
        let result = MinConflictsRunner::run(&mut p, &config).unwrap();
        assert_eq!(p.value(names["sa"]), Some(&"green"));
        assert!(result.solved);
    }

    #[test]
    fn test_tabu_bound_is_checked() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        p.assign(names["wa"], "red").unwrap();
        let config = MinConflictsConfig::default().with_tabu_size(6);
        assert!(matches!(
            MinConflictsRunner::run(&mut p, &config),
            Err(CspError::InvalidConfig(_))
        ));
        assert_eq!(p.assigned_variables(), vec![names["wa"]], "nothing was assigned");
        let config = MinConflictsConfig::default().with_tabu_size(5).with_seed(1);
        assert!(MinConflictsRunner::run(&mut p, &config).is_ok());
    }

    #[test]
    fn test_zero_steps_is_invalid() {
        let (mut p, _) = map_coloring(&["red", "green", "blue"]);
        let config = MinConflictsConfig::default().with_max_steps(0);
        assert!(MinConflictsRunner::run(&mut p, &config).is_err());
    }

    #[test]
    fn test_unsolvable_keeps_best_assignment() {
        let (mut p, _) = map_coloring(&["red", "green"]);
        let config = MinConflictsConfig::default().with_max_steps(200).with_seed(5);
        let result = MinConflictsRunner::run(&mut p, &config).unwrap();
        assert!(!result.solved);
        assert!(result.conflicts >= 1);
        assert_eq!(result.conflicts, p.conflict_count());
        assert!(p.is_completely_assigned());
    }

    proptest! {
        #[test]
        fn prop_never_worse_than_the_random_start(seed in any::<u64>(), steps in 1usize..50) {
            let (base, _) = map_coloring(&["red", "green"]);

            // the same seed reproduces the initial random assignment
            let mut start = base.clone();
            let mut rng = create_rng(Some(seed));
            start.assign_randomly(&HashSet::new(), &mut rng);
            let initial = start.conflict_count();

            let mut p = base.clone();
            let config = MinConflictsConfig::default().with_max_steps(steps).with_seed(seed);
            let result = MinConflictsRunner::run(&mut p, &config).unwrap();
            prop_assert!(result.conflicts <= initial);
            prop_assert_eq!(result.conflicts, p.conflict_count());
        }
    }
}
