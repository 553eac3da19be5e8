//! Core trait definition for genetic local search.
//!
//! [`GeneticProblem`] is the contract between the generic evolutionary loop
//! in [`GaRunner`](super::GaRunner) and a representation strategy such as
//! [`GeneralGenetic`](super::GeneralGenetic) or
//! [`GridGenetic`](super::GridGenetic).

use std::collections::HashSet;

use rand::Rng;

use crate::error::Result;
use crate::model::{Assignment, ConstraintProblem, Value, VariableId};

/// Defines how a population of complete assignments is created, scored,
/// selected, recombined and mutated.
///
/// Individuals are detached [`Assignment`] snapshots; the problem is only
/// read. Variables in `read_only` must keep their current value in every
/// individual.
///
/// # Fitness
///
/// Higher fitness is better. The runner does not compare fitness against
/// any target: it stops as soon as an individual satisfies every
/// constraint.
pub trait GeneticProblem<V: Value> {
    /// Creates `size` complete individuals.
    fn generate_population<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        size: usize,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> Result<Vec<Assignment<V>>>;

    /// Scores an individual. Higher is better.
    fn calculate_fitness(&self, problem: &ConstraintProblem<V>, individual: &Assignment<V>)
        -> usize;

    /// Chooses the parents of the next generation.
    ///
    /// The default is half truncation: the fitter half survives, ties kept
    /// in population order.
    fn perform_natural_selection(
        &self,
        problem: &ConstraintProblem<V>,
        mut population: Vec<Assignment<V>>,
    ) -> Vec<Assignment<V>> {
        population.sort_by_cached_key(|individual| {
            std::cmp::Reverse(self.calculate_fitness(problem, individual))
        });
        population.truncate(population.len() / 2);
        population
    }

    /// Breeds `size` children from `parents`.
    fn reproduce_next_generation<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        parents: &[Assignment<V>],
        size: usize,
        rng: &mut R,
    ) -> Vec<Assignment<V>>;

    /// Mutates each individual in place with probability
    /// `mutation_probability`.
    fn mutate_population<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        population: &mut [Assignment<V>],
        mutation_probability: f64,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    );
}
