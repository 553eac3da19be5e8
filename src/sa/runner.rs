//! SA execution loop.

use log::{debug, trace};
use rand::Rng;

use super::config::{CoolingSchedule, SaConfig};
use crate::error::{CspError, Result};
use crate::local::{read_only_set, LocalSearchProblem};
use crate::model::{ConstraintProblem, Value};
use crate::random::create_rng;

/// Best score is sampled into the history every this many steps.
const HISTORY_INTERVAL: usize = 100;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone, PartialEq)]
pub struct SaResult {
    /// Whether the installed assignment satisfies every constraint.
    pub solved: bool,

    /// Score of the installed assignment.
    pub best_score: f64,

    /// Unsatisfied constraints under the installed assignment.
    pub conflicts: usize,

    /// Successor evaluations made.
    pub steps: usize,

    /// Temperature when the run ended.
    pub final_temperature: f64,

    /// Accepted moves, improving ones included.
    pub accepted_moves: usize,

    pub improving_moves: usize,

    /// Best score sampled at regular intervals, ending with the final one.
    pub score_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Anneals with `strategy` and installs into `problem` the first
    /// solution reached, or the best state seen once `max_steps` successors
    /// have been evaluated.
    ///
    /// Every step draws one successor. An improving successor is always
    /// taken; any other is taken with probability `exp(delta / T)`. The
    /// temperature cools every `steps_per_temperature` steps and never drops
    /// below the configured floor.
    ///
    /// # Errors
    ///
    /// [`CspError::InvalidConfig`] if the config does not validate, or any
    /// error of the strategy's `initial_state`.
    pub fn run<V: Value, P: LocalSearchProblem<V>>(
        problem: &mut ConstraintProblem<V>,
        strategy: &P,
        config: &SaConfig,
    ) -> Result<SaResult> {
        config.validate().map_err(CspError::InvalidConfig)?;
        let read_only = read_only_set(problem, &config.read_only);
        let mut rng = create_rng(config.seed);

        let mut current = strategy.initial_state(problem, &read_only, &mut rng)?;
        let mut current_score = strategy.score(problem, &current);
        let mut best = current.clone();
        let mut best_score = current_score;

        let mut temperature = config.initial_temperature;
        let mut steps = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut score_history = vec![best_score];

        while steps < config.max_steps && !problem.is_solution(&current) {
            let neighbor = strategy.successor(problem, &current, &read_only, &mut rng);
            let neighbor_score = strategy.score(problem, &neighbor);
            let delta = neighbor_score - current_score;
            steps += 1;

            // Metropolis acceptance, maximizing
            let accept = if delta > 0.0 {
                improving_moves += 1;
                true
            } else {
                rng.random_range(0.0..1.0) < (delta / temperature).exp()
            };
            if accept {
                current = neighbor;
                current_score = neighbor_score;
                accepted_moves += 1;
                if current_score > best_score {
                    best = current.clone();
                    best_score = current_score;
                }
            }

            if steps % config.steps_per_temperature == 0 {
                temperature = cool(temperature, config, steps / config.steps_per_temperature);
                trace!("sa: step {steps}, T = {temperature:.6}, best score {best_score}");
            }
            if steps % HISTORY_INTERVAL == 0 {
                score_history.push(best_score);
            }
        }

        // a solution wins even when the strategy scores it below `best`
        if problem.is_solution(&current) {
            best = current;
            best_score = current_score;
        }
        if score_history.last() != Some(&best_score) {
            score_history.push(best_score);
        }

        problem.assign_from(&best)?;
        let conflicts = problem.conflict_count();
        debug!(
            "sa: best score {best_score}, {conflicts} conflicts after {steps} steps \
             ({accepted_moves} accepted), final T = {temperature:.6}"
        );

        Ok(SaResult {
            solved: conflicts == 0 && problem.is_completely_assigned(),
            best_score,
            conflicts,
            steps,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            score_history,
        })
    }
}

/// Temperature after the `cooled`-th cooling step, clamped to the floor.
fn cool(temperature: f64, config: &SaConfig, cooled: usize) -> f64 {
    let next = match config.cooling {
        CoolingSchedule::Geometric { rate } => temperature * rate,
        CoolingSchedule::Linear => {
            let total = (config.max_steps / config.steps_per_temperature).max(1);
            let span = config.initial_temperature - config.temperature_floor;
            config.initial_temperature - cooled as f64 * span / total as f64
        }
        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
    };
    next.max(config.temperature_floor)
}
