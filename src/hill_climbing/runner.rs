//! Hill climbing execution loop.

use log::{debug, trace};

use super::config::HillClimbingConfig;
use crate::error::{CspError, Result};
use crate::local::{read_only_set, LocalSearchProblem};
use crate::model::{Assignment, ConstraintProblem, Value};
use crate::random::create_rng;

/// Result of a hill climbing run.
#[derive(Debug, Clone, PartialEq)]
pub struct HillClimbingResult {
    /// Whether the installed assignment satisfies every constraint.
    pub solved: bool,

    /// Score of the installed assignment.
    pub best_score: f64,

    /// Unsatisfied constraints under the installed assignment.
    pub conflicts: usize,

    /// Starting states generated.
    pub restarts: usize,

    /// Improving moves made over all restarts.
    pub steps: usize,
}

/// Executes random-restart first-choice hill climbing.
pub struct HillClimbingRunner;

impl HillClimbingRunner {
    /// Climbs with `strategy` and installs the best state seen into
    /// `problem`: the first solution found, or the highest-scoring state
    /// once the restart budget is spent.
    ///
    /// # Errors
    ///
    /// [`CspError::InvalidConfig`] if the config does not validate, or any
    /// error of the strategy's `initial_state`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_csp::hill_climbing::{HillClimbingConfig, HillClimbingRunner};
    /// use u_csp::local::RandomReassignment;
    /// use u_csp::model::{evaluators, ConstraintProblem};
    ///
    /// let mut problem = ConstraintProblem::new();
    /// let ids = problem.add_variables(3, ['a', 'b', 'c']);
    /// problem.add_constraint(ids, evaluators::all_different()).unwrap();
    ///
    /// let config = HillClimbingConfig::default().with_seed(3);
    /// let result = HillClimbingRunner::run(&mut problem, &RandomReassignment, &config).unwrap();
    /// assert!(result.solved);
    /// ```
    pub fn run<V: Value, P: LocalSearchProblem<V>>(
        problem: &mut ConstraintProblem<V>,
        strategy: &P,
        config: &HillClimbingConfig,
    ) -> Result<HillClimbingResult> {
        config.validate().map_err(CspError::InvalidConfig)?;
        let read_only = read_only_set(problem, &config.read_only);
        let mut rng = create_rng(config.seed);

        let mut best: Option<(f64, Assignment<V>)> = None;
        let mut restarts = 0;
        let mut steps = 0;

        'restarts: for _ in 0..config.max_restarts {
            restarts += 1;
            let mut current = strategy.initial_state(problem, &read_only, &mut rng)?;
            let mut current_score = strategy.score(problem, &current);
            trace!("hill climbing: restart {restarts} starts at score {current_score}");

            for _ in 0..config.max_steps {
                if problem.is_solution(&current) {
                    best = Some((current_score, current));
                    break 'restarts;
                }
                if best.as_ref().map_or(true, |(score, _)| current_score > *score) {
                    best = Some((current_score, current.clone()));
                }

                let improved = (0..config.max_successors)
                    .map(|_| {
                        let next = strategy.successor(problem, &current, &read_only, &mut rng);
                        (strategy.score(problem, &next), next)
                    })
                    .find(|(score, _)| *score > current_score);
                match improved {
                    Some((score, next)) => {
                        current = next;
                        current_score = score;
                        steps += 1;
                    }
                    None => break,
                }
            }

            if problem.is_solution(&current) {
                best = Some((current_score, current));
                break;
            }
            if best.as_ref().map_or(true, |(score, _)| current_score > *score) {
                best = Some((current_score, current));
            }
        }

        let best_score = match best {
            Some((score, state)) => {
                problem.assign_from(&state)?;
                score
            }
            None => f64::NEG_INFINITY,
        };
        let conflicts = problem.conflict_count();
        debug!(
            "hill climbing: best score {best_score}, {conflicts} conflicts after \
             {restarts} restarts and {steps} steps"
        );

        Ok(HillClimbingResult {
            solved: problem.is_completely_consistently_assigned(),
            best_score,
            conflicts,
            restarts,
            steps,
        })
    }
}
