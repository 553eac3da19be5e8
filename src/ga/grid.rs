//! Genetic strategy for block-structured grids.

use std::collections::HashSet;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::types::GeneticProblem;
use crate::error::Result;
use crate::grid::GridLayout;
use crate::model::{Assignment, ConstraintProblem, Value, VariableId};

/// Works on an `n`x`n` grid whose blocks must each hold every symbol once,
/// such as the problems built by [`grid_problem`](crate::grid::grid_problem).
///
/// Every individual keeps each block a permutation of the symbols, so only
/// rows and columns can clash:
///
/// - Individuals: every block filled with a shuffle of its missing symbols.
/// - Fitness: distinct values per row plus distinct values per column.
/// - Crossover: one cut point between blocks; blocks before it come from
///   the first parent, the rest from the second.
/// - Mutation: two free cells of a random block swap values.
#[derive(Debug, Clone)]
pub struct GridGenetic<V> {
    layout: GridLayout<V>,
}

impl<V: Value> GridGenetic<V> {
    /// # Errors
    ///
    /// [`CspError::InvalidGrid`](crate::CspError::InvalidGrid) if `problem`
    /// is not a grid.
    pub fn new(problem: &ConstraintProblem<V>) -> Result<Self> {
        Ok(Self {
            layout: GridLayout::new(problem)?,
        })
    }

    pub fn layout(&self) -> &GridLayout<V> {
        &self.layout
    }

    fn crossover<R: Rng + ?Sized>(
        &self,
        first: &Assignment<V>,
        second: &Assignment<V>,
        rng: &mut R,
    ) -> Assignment<V> {
        let mut child = second.clone();
        let cut = rng.random_range(1..self.layout.size());
        for id in (0..cut).flat_map(|b| self.layout.block(b)) {
            child.set(id, first.get(id).cloned());
        }
        child
    }
}

impl<V: Value> GeneticProblem<V> for GridGenetic<V> {
    fn generate_population<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        size: usize,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> Result<Vec<Assignment<V>>> {
        (0..size)
            .map(|_| {
                let mut individual = problem.current_assignment();
                self.layout
                    .fill_blocks(problem, &mut individual, read_only, rng)?;
                Ok(individual)
            })
            .collect()
    }

    fn calculate_fitness(&self, _problem: &ConstraintProblem<V>, individual: &Assignment<V>) -> usize {
        self.layout.distinct_score(individual)
    }

    fn reproduce_next_generation<R: Rng + ?Sized>(
        &self,
        _problem: &ConstraintProblem<V>,
        parents: &[Assignment<V>],
        size: usize,
        rng: &mut R,
    ) -> Vec<Assignment<V>> {
        if parents.len() < 2 || self.layout.size() < 2 {
            return parents.iter().cycle().take(size).cloned().collect();
        }
        (0..size)
            .map(|_| {
                let pair: Vec<&Assignment<V>> = parents.choose_multiple(rng, 2).collect();
                self.crossover(pair[0], pair[1], rng)
            })
            .collect()
    }

    fn mutate_population<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        population: &mut [Assignment<V>],
        mutation_probability: f64,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) {
        for individual in population.iter_mut() {
            if rng.random_bool(mutation_probability) {
                self.layout.swap_in_block(problem, individual, read_only, rng);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::test_fixtures::{four_by_four, n_queens};

    fn block_is_permutation(layout: &GridLayout<u8>, individual: &Assignment<u8>, b: usize) -> bool {
        let values: HashSet<u8> = layout
            .block(b)
            .into_iter()
            .filter_map(|id| individual.get(id).copied())
            .collect();
        values.len() == layout.size()
    }

    #[test]
    fn test_population_has_permutation_blocks() {
        let p = four_by_four();
        let strategy = GridGenetic::new(&p).unwrap();
        let read_only: HashSet<_> = p.assigned_variables().into_iter().collect();
        let mut rng = create_rng(Some(1));
        let population = strategy.generate_population(&p, 10, &read_only, &mut rng).unwrap();
        for individual in &population {
            assert!(individual.is_complete());
            assert!((0..4).all(|b| block_is_permutation(strategy.layout(), individual, b)));
            for &id in &read_only {
                assert_eq!(individual.get(id), p.value(id));
            }
        }
    }

    #[test]
    fn test_crossover_takes_whole_blocks() {
        let p = four_by_four();
        let strategy = GridGenetic::new(&p).unwrap();
        let read_only: HashSet<_> = p.assigned_variables().into_iter().collect();
        let mut rng = create_rng(Some(2));
        let parents = strategy.generate_population(&p, 2, &read_only, &mut rng).unwrap();
        for _ in 0..20 {
            let child = strategy.crossover(&parents[0], &parents[1], &mut rng);
            for b in 0..4 {
                let cells = strategy.layout().block(b);
                let from_first = cells.iter().all(|&id| child.get(id) == parents[0].get(id));
                let from_second = cells.iter().all(|&id| child.get(id) == parents[1].get(id));
                assert!(from_first || from_second);
            }
            let first_block = strategy.layout().block(0);
            assert!(first_block.iter().all(|&id| child.get(id) == parents[0].get(id)));
        }
    }

    #[test]
    fn test_mutation_keeps_blocks_intact() {
        let p = four_by_four();
        let strategy = GridGenetic::new(&p).unwrap();
        let read_only: HashSet<_> = p.assigned_variables().into_iter().collect();
        let mut rng = create_rng(Some(3));
        let mut population = strategy.generate_population(&p, 5, &read_only, &mut rng).unwrap();
        let before = population.clone();
        strategy.mutate_population(&p, &mut population, 1.0, &read_only, &mut rng);
        for (old, new) in before.iter().zip(&population) {
            assert_eq!(p.variables().filter(|&id| old[id] != new[id]).count(), 2);
            assert!((0..4).all(|b| block_is_permutation(strategy.layout(), new, b)));
        }
    }

    #[test]
    fn test_rejects_non_grid() {
        assert!(GridGenetic::new(&n_queens(5)).is_err());
    }
}
