//! Core trait for state-based local search.

use std::collections::HashSet;

use log::warn;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::Result;
use crate::grid::GridLayout;
use crate::model::{Assignment, ConstraintProblem, Value, VariableId};

/// How hill climbing and simulated annealing move through complete
/// assignments of a [`ConstraintProblem`].
///
/// The runners handle restarts, acceptance and bookkeeping; the strategy
/// decides where to start, what a neighboring state is and how good a state
/// is. Variables in `read_only` must keep their values in every state.
///
/// # Maximization
///
/// Higher scores are better. The runners stop early as soon as a state
/// satisfies every constraint, whatever its score.
pub trait LocalSearchProblem<V: Value> {
    /// Creates a complete starting state.
    fn initial_state<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> Result<Assignment<V>>;

    /// Generates a state close to `state`.
    fn successor<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        state: &Assignment<V>,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> Assignment<V>;

    /// Scores a state. Higher is better.
    fn score(&self, problem: &ConstraintProblem<V>, state: &Assignment<V>) -> f64;
}

/// General-purpose strategy: random starting values, one variable changed
/// per move, scored by the number of consistent constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomReassignment;

impl<V: Value> LocalSearchProblem<V> for RandomReassignment {
    fn initial_state<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> Result<Assignment<V>> {
        Ok(random_completion(problem, read_only, rng))
    }

    fn successor<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        state: &Assignment<V>,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> Assignment<V> {
        let mut next = state.clone();
        reassign_randomly(problem, &mut next, read_only, 1, rng);
        next
    }

    fn score(&self, problem: &ConstraintProblem<V>, state: &Assignment<V>) -> f64 {
        problem.consistent_count_in(state) as f64
    }
}

/// Grid strategy: blocks start as permutations of the symbols and moves swap
/// two free cells inside one block. Scored by the distinct values per row
/// and column.
#[derive(Debug, Clone)]
pub struct GridSwap<V> {
    layout: GridLayout<V>,
}

impl<V: Value> GridSwap<V> {
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
}

impl<V: Value> LocalSearchProblem<V> for GridSwap<V> {
    fn initial_state<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> Result<Assignment<V>> {
        let mut state = problem.current_assignment();
        self.layout.fill_blocks(problem, &mut state, read_only, rng)?;
        Ok(state)
    }

    fn successor<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        state: &Assignment<V>,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> Assignment<V> {
        let mut next = state.clone();
        self.layout.swap_in_block(problem, &mut next, read_only, rng);
        next
    }

    fn score(&self, _problem: &ConstraintProblem<V>, state: &Assignment<V>) -> f64 {
        self.layout.distinct_score(state) as f64
    }
}

/// The current values of `problem` with every variable outside `read_only`
/// set to a uniformly random domain value.
pub(crate) fn random_completion<V: Value, R: Rng + ?Sized>(
    problem: &ConstraintProblem<V>,
    read_only: &HashSet<VariableId>,
    rng: &mut R,
) -> Assignment<V> {
    let mut state = problem.current_assignment();
    for id in problem.variables().filter(|id| !read_only.contains(id)) {
        match problem.domain(id).choose(rng) {
            Some(value) => state.set(id, Some(value.clone())),
            None => warn!("variable {id} has an empty domain and stays unassigned"),
        }
    }
    state
}

/// Gives `count` distinct random variables outside `read_only` a new
/// random value, different from the current one when the domain allows.
pub(crate) fn reassign_randomly<V: Value, R: Rng + ?Sized>(
    problem: &ConstraintProblem<V>,
    state: &mut Assignment<V>,
    read_only: &HashSet<VariableId>,
    count: usize,
    rng: &mut R,
) {
    let free: Vec<VariableId> = problem
        .variables()
        .filter(|id| !read_only.contains(id))
        .collect();
    for &id in free.choose_multiple(rng, count) {
        let current = state.get(id).cloned();
        let others: Vec<&V> = problem
            .domain(id)
            .iter()
            .filter(|&v| Some(v) != current.as_ref())
            .collect();
        let value = match others.choose(rng) {
            Some(&value) => Some(value.clone()),
            None => current,
        };
        state.set(id, value);
    }
}

/// Variables assigned on entry together with `extra`.
pub(crate) fn read_only_set<V: Value>(
    problem: &ConstraintProblem<V>,
    extra: &HashSet<VariableId>,
) -> HashSet<VariableId> {
    for &id in extra {
        if !problem.is_assigned(id) {
            warn!("read-only variable {id} is unassigned and stays so");
        }
    }
    problem
        .assigned_variables()
        .into_iter()
        .chain(extra.iter().copied())
        .collect()
}
