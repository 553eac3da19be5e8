//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → solution check → selection → crossover → mutation → repeat.

use log::{debug, trace};

use super::config::GaConfig;
use super::types::GeneticProblem;
use crate::error::{CspError, Result};
use crate::local::read_only_set;
use crate::model::{Assignment, ConstraintProblem, Value};
use crate::random::create_rng;

/// Result of a genetic local search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaResult<V> {
    /// The installed individual: the first solution found, or the fittest
    /// individual seen.
    pub best: Assignment<V>,

    /// Fitness of `best`.
    pub best_fitness: usize,

    /// Whether `best` satisfies every constraint.
    pub solved: bool,

    /// Total number of generations bred.
    pub generations: usize,

    /// Best fitness so far at the end of each generation, starting with the
    /// initial population.
    pub fitness_history: Vec<usize>,
}

/// Executes genetic local search.
///
/// # Usage
///
/// ```
/// use u_csp::ga::{GaConfig, GaRunner, GeneralGenetic};
/// use u_csp::model::{evaluators, ConstraintProblem};
///
/// let mut problem = ConstraintProblem::new();
/// let ids = problem.add_variables(3, [1, 2, 3]);
/// problem.add_constraint(ids, evaluators::all_different()).unwrap();
///
/// let config = GaConfig::default().with_population_size(20).with_seed(42);
/// let result = GaRunner::run(&mut problem, &GeneralGenetic::default(), &config).unwrap();
/// assert!(result.solved);
/// assert!(problem.is_completely_consistently_assigned());
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Evolves a population with `strategy` and installs the result into
    /// `problem`.
    ///
    /// # Errors
    ///
    /// [`CspError::InvalidConfig`] if the configuration is invalid, or any
    /// error of the strategy's `generate_population`.
    pub fn run<V: Value, P: GeneticProblem<V>>(
        problem: &mut ConstraintProblem<V>,
        strategy: &P,
        config: &GaConfig,
    ) -> Result<GaResult<V>> {
        config.validate().map_err(CspError::InvalidConfig)?;
        let read_only = read_only_set(problem, &config.read_only);
        let mut rng = create_rng(config.seed);

        // 1. Initialize population
        let mut population =
            strategy.generate_population(problem, config.population_size, &read_only, &mut rng)?;

        // 2. Track best
        let mut best = fittest(problem, strategy, &population);
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.as_ref().map_or(0, |(fitness, _)| *fitness));

        let mut generations = 0;
        let mut solution = None;

        // 3. Evolutionary loop
        for gen in 0..config.max_generations {
            if let Some(found) = population.iter().find(|i| problem.is_solution(i)) {
                solution = Some(found.clone());
                break;
            }

            let parents = strategy.perform_natural_selection(problem, population);
            let mut next_gen = strategy.reproduce_next_generation(
                problem,
                &parents,
                config.population_size,
                &mut rng,
            );
            strategy.mutate_population(
                problem,
                &mut next_gen,
                config.mutation_probability,
                &read_only,
                &mut rng,
            );
            population = next_gen;
            generations = gen + 1;

            if let Some((fitness, individual)) = fittest(problem, strategy, &population) {
                if best.as_ref().map_or(true, |(b, _)| fitness > *b) {
                    best = Some((fitness, individual));
                }
            }
            let best_fitness = best.as_ref().map_or(0, |(fitness, _)| *fitness);
            fitness_history.push(best_fitness);
            trace!("ga: generation {generations}, best fitness {best_fitness}");
        }

        // the last generation is never checked inside the loop
        if solution.is_none() {
            solution = population.iter().find(|i| problem.is_solution(i)).cloned();
        }

        let (best_fitness, best) = match solution {
            Some(found) => (strategy.calculate_fitness(problem, &found), found),
            None => best.ok_or_else(|| {
                CspError::InvalidConfig("the strategy generated an empty population".into())
            })?,
        };
        problem.assign_from(&best)?;
        let solved = problem.is_completely_consistently_assigned();
        debug!("ga: best fitness {best_fitness} after {generations} generations, solved: {solved}");

        Ok(GaResult {
            best,
            best_fitness,
            solved,
            generations,
            fitness_history,
        })
    }
}

/// The fittest individual of `population`, the first one among ties.
fn fittest<V: Value, P: GeneticProblem<V>>(
    problem: &ConstraintProblem<V>,
    strategy: &P,
    population: &[Assignment<V>],
) -> Option<(usize, Assignment<V>)> {
    population
        .iter()
        .map(|individual| (strategy.calculate_fitness(problem, individual), individual))
        .fold(None, |best: Option<(usize, &Assignment<V>)>, (fitness, individual)| match best {
            Some((b, _)) if b >= fitness => best,
            _ => Some((fitness, individual)),
        })
        .map(|(fitness, individual)| (fitness, individual.clone()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{GeneralGenetic, GridGenetic};
    use crate::test_fixtures::{four_by_four, map_coloring, FOUR_BY_FOUR_SOLUTION};

    #[test]
    fn test_general_solves_map_coloring() {
        let (mut p, _) = map_coloring(&["red", "green", "blue"]);
        let config = GaConfig::default()
            .with_population_size(30)
            .with_max_generations(200)
            .with_mutation_probability(0.3)
            .with_seed(42);

        let result = GaRunner::run(&mut p, &GeneralGenetic::new(0.2), &config).unwrap();

        assert!(result.solved);
        assert!(p.is_completely_consistently_assigned());
        assert_eq!(result.best_fitness, p.constraint_count());
        assert_eq!(result.best, p.current_assignment());
    }

    #[test]
    fn test_grid_solves_four_by_four() {
        let mut p = four_by_four();
        let strategy = GridGenetic::new(&p).unwrap();
        let config = GaConfig::default()
            .with_population_size(40)
            .with_max_generations(300)
            .with_mutation_probability(0.5)
            .with_seed(7);

        let result = GaRunner::run(&mut p, &strategy, &config).unwrap();

        assert!(result.solved);
        assert_eq!(result.best_fitness, 32);
        for i in [0, 7, 9, 14] {
            assert_eq!(p.value(p.variables().nth(i).unwrap()), Some(&FOUR_BY_FOUR_SOLUTION[i]));
        }
    }

    #[test]
    fn test_unsolvable_installs_fittest() {
        let (mut p, names) = map_coloring(&["red", "green"]);
        p.assign(names["wa"], "red").unwrap();
        let config = GaConfig::default()
            .with_population_size(10)
            .with_max_generations(15)
            .with_seed(5);

        let result = GaRunner::run(&mut p, &GeneralGenetic::default(), &config).unwrap();

        assert!(!result.solved);
        assert_eq!(result.generations, 15);
        assert_eq!(result.fitness_history.len(), 16);
        assert_eq!(p.value(names["wa"]), Some(&"red"));
        assert_eq!(result.best_fitness, p.consistent_constraints().len());
        for window in result.fitness_history.windows(2) {
            assert!(window[0] <= window[1]);
        }
    }

    #[test]
    fn test_invalid_config() {
        let (mut p, _) = map_coloring(&["red", "green", "blue"]);
        let config = GaConfig::default().with_population_size(2);
        assert!(matches!(
            GaRunner::run(&mut p, &GeneralGenetic::default(), &config),
            Err(CspError::InvalidConfig(_))
        ));
    }
}
