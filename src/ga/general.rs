//! Genetic strategy for arbitrary problems.

use std::collections::HashSet;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::types::GeneticProblem;
use crate::error::Result;
use crate::local::{random_completion, reassign_randomly};
use crate::model::{Assignment, ConstraintProblem, Value, VariableId};

/// Works on any [`ConstraintProblem`].
///
/// - Individuals: uniformly random values for every free variable.
/// - Fitness: number of consistent constraints.
/// - Crossover: every variable inherits from either parent with equal
///   probability.
/// - Mutation: `mutation_fraction` of the variables, rounded up and capped
///   at the free ones, get a new random value. Any positive fraction
///   mutates at least one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralGenetic {
    mutation_fraction: f64,
}

impl GeneralGenetic {
    /// `mutation_fraction` is clamped to `[0, 1]`.
    pub fn new(mutation_fraction: f64) -> Self {
        Self {
            mutation_fraction: mutation_fraction.clamp(0.0, 1.0),
        }
    }

    pub fn mutation_fraction(&self) -> f64 {
        self.mutation_fraction
    }
}

impl Default for GeneralGenetic {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl<V: Value> GeneticProblem<V> for GeneralGenetic {
    fn generate_population<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        size: usize,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> Result<Vec<Assignment<V>>> {
        Ok((0..size)
            .map(|_| random_completion(problem, read_only, rng))
            .collect())
    }

    fn calculate_fitness(&self, problem: &ConstraintProblem<V>, individual: &Assignment<V>) -> usize {
        problem.consistent_count_in(individual)
    }

    fn reproduce_next_generation<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        parents: &[Assignment<V>],
        size: usize,
        rng: &mut R,
    ) -> Vec<Assignment<V>> {
        if parents.len() < 2 {
            return parents.iter().cycle().take(size).cloned().collect();
        }
        let mut children = Vec::with_capacity(size);
        while children.len() < size {
            let pair: Vec<&Assignment<V>> = parents.choose_multiple(rng, 2).collect();
            let child = problem
                .variables()
                .map(|id| {
                    let parent = if rng.random_bool(0.5) { pair[0] } else { pair[1] };
                    parent.get(id).cloned()
                })
                .collect();
            children.push(child);
        }
        children
    }

    fn mutate_population<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        population: &mut [Assignment<V>],
        mutation_probability: f64,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) {
        let count = mutation_count(problem.variable_count(), self.mutation_fraction);
        for individual in population.iter_mut() {
            if rng.random_bool(mutation_probability) {
                reassign_randomly(problem, individual, read_only, count, rng);
            }
        }
    }
}

fn mutation_count(variable_count: usize, fraction: f64) -> usize {
    (variable_count as f64 * fraction).ceil() as usize
}
