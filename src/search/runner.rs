//! Depth-first backtracking search.

use std::iter::FusedIterator;

use log::{debug, trace, warn};

use super::config::BacktrackingConfig;
use crate::error::{CspError, Result};
use crate::model::{Action, ActionHistory, Assignment, ConstraintProblem, Value, VariableId};

/// Result of a find-first backtracking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktrackingResult<V> {
    /// Whether the problem ended fully and consistently assigned.
    pub solved: bool,

    /// Every assign and unassign performed, in order. Empty unless the
    /// config enables history.
    pub history: Vec<Action<V>>,

    /// Tentative assignments made.
    pub assignments: usize,

    /// Variables whose values were all exhausted.
    pub backtracks: usize,
}

/// Backtracking search over the unassigned variables of a problem.
///
/// Variables assigned on entry keep their values. Each tentative value is
/// checked against the constraints of its variable before it is assigned,
/// then the configured inference runs; an inference failure only rules out
/// that value.
///
/// # Examples
///
/// ```
/// use u_csp::model::{evaluators, ConstraintProblem};
/// use u_csp::search::{BacktrackingConfig, BacktrackingRunner};
///
/// let mut problem = ConstraintProblem::new();
/// let ids = problem.add_variables(3, [1, 2, 3]);
/// problem.add_constraint(ids.clone(), evaluators::all_different()).unwrap();
///
/// let result = BacktrackingRunner::run(&mut problem, &BacktrackingConfig::heuristic()).unwrap();
/// assert!(result.solved);
/// assert!(problem.is_completely_consistently_assigned());
/// ```
pub struct BacktrackingRunner;

impl BacktrackingRunner {
    /// Searches for one solution and leaves it assigned in `problem`.
    ///
    /// Domains pruned by inference are restored either way. When there is no
    /// solution, every variable unassigned on entry is unassigned again.
    ///
    /// # Errors
    ///
    /// [`CspError::InvalidConfig`] if the config does not validate.
    pub fn run<V: Value>(
        problem: &mut ConstraintProblem<V>,
        config: &BacktrackingConfig,
    ) -> Result<BacktrackingResult<V>> {
        config.validate().map_err(CspError::InvalidConfig)?;
        let mut search = Search::new(problem, config.clone(), config.with_history);
        let solved = search.advance();
        search.restore_pruned_domains();
        debug!(
            "backtracking: solved={solved} after {} assignments, {} backtracks",
            search.assignments, search.backtracks
        );
        Ok(BacktrackingResult {
            solved,
            history: search.history.into_actions(),
            assignments: search.assignments,
            backtracks: search.backtracks,
        })
    }

    /// Lazily enumerates every solution.
    ///
    /// Each item is a snapshot of the complete assignment; the problem also
    /// holds it until the next call, with domains possibly pruned by
    /// inference. History is never recorded. Once exhausted, the variables
    /// are unassigned as on entry. Dropping the iterator early leaves the
    /// current partial assignment in place.
    ///
    /// # Errors
    ///
    /// [`CspError::InvalidConfig`] if the config does not validate.
    pub fn solutions<'p, V: Value>(
        problem: &'p mut ConstraintProblem<V>,
        config: &BacktrackingConfig,
    ) -> Result<Solutions<'p, V>> {
        config.validate().map_err(CspError::InvalidConfig)?;
        Ok(Solutions {
            search: Search::new(problem, config.clone(), false),
        })
    }
}

/// Iterator returned by [`BacktrackingRunner::solutions`].
pub struct Solutions<'p, V: Value> {
    search: Search<'p, V>,
}

impl<V: Value> Iterator for Solutions<'_, V> {
    type Item = Assignment<V>;

    fn next(&mut self) -> Option<Assignment<V>> {
        if self.search.advance() {
            Some(self.search.problem.current_assignment())
        } else {
            None
        }
    }
}

impl<V: Value> FusedIterator for Solutions<'_, V> {}

/// A variable being branched on and the values left to try.
struct Frame<V> {
    variable: VariableId,
    values: Vec<V>,
    next: usize,
    assigned: bool,
    saved_domains: Option<Vec<(VariableId, Vec<V>)>>,
}

/// Suspended depth-first search. The stack holds one frame per branching
/// variable, so the search can stop at a solution and resume from it.
struct Search<'p, V: Value> {
    problem: &'p mut ConstraintProblem<V>,
    config: BacktrackingConfig,
    stack: Vec<Frame<V>>,
    history: ActionHistory<V>,
    assignments: usize,
    backtracks: usize,
    started: bool,
    exhausted: bool,
}

impl<'p, V: Value> Search<'p, V> {
    fn new(problem: &'p mut ConstraintProblem<V>, config: BacktrackingConfig, history: bool) -> Self {
        Self {
            problem,
            config,
            stack: Vec::new(),
            history: ActionHistory::new(history),
            assignments: 0,
            backtracks: 0,
            started: false,
            exhausted: false,
        }
    }

    /// Moves to the next complete consistent assignment. `false` once the
    /// tree is exhausted.
    fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        if !self.started {
            self.started = true;
            match self.select() {
                Some(variable) => self.push(variable),
                None => {
                    // nothing to search: the current state is the only candidate
                    self.exhausted = true;
                    return self.problem.is_completely_consistently_assigned();
                }
            }
        }

        let inference = self.config.inference;
        loop {
            let Some(frame) = self.stack.last_mut() else {
                self.exhausted = true;
                return false;
            };
            if frame.assigned {
                undo(self.problem, &mut self.history, frame);
            }
            if frame.next >= frame.values.len() {
                trace!("backtracking: {} exhausted", frame.variable);
                self.stack.pop();
                self.backtracks += 1;
                continue;
            }

            let variable = frame.variable;
            let value = frame.values[frame.next].clone();
            frame.next += 1;
            if !self.problem.accepts_value_with(variable, &value, &[]) {
                continue;
            }
            let saved = inference.prunes().then(|| {
                let others = self
                    .problem
                    .unassigned_variables()
                    .into_iter()
                    .filter(|&id| id != variable);
                self.problem.snapshot_domains(others)
            });
            if let Err(e) = self.problem.assign(variable, value.clone()) {
                warn!("backtracking: skipping {value:?} for {variable}: {e}");
                if let Some(saved) = saved {
                    self.problem.restore_domains(saved);
                }
                continue;
            }
            self.history.assigned(variable, &value);
            self.assignments += 1;
            frame.assigned = true;
            frame.saved_domains = saved;

            if !inference.apply(self.problem, variable) {
                trace!("backtracking: inference rejects {variable} = {value:?}");
                continue;
            }
            match self.select() {
                Some(next) => self.push(next),
                None if self.problem.is_completely_consistently_assigned() => return true,
                None => continue,
            }
        }
    }

    /// Puts back every domain pruned by inference along the current branch.
    /// Assigned values stay.
    fn restore_pruned_domains(&mut self) {
        for frame in self.stack.iter_mut().rev() {
            if let Some(saved) = frame.saved_domains.take() {
                self.problem.restore_domains(saved);
            }
        }
    }

    fn select(&self) -> Option<VariableId> {
        let unassigned = self.problem.unassigned_variables();
        if unassigned.is_empty() {
            return None;
        }
        let mut best = self.config.primary.best(self.problem, &unassigned);
        if best.len() > 1 {
            if let Some(tie) = self.config.tie_breaker {
                best = tie.best(self.problem, &best);
            }
        }
        best.first().copied()
    }

    fn push(&mut self, variable: VariableId) {
        let values = self.config.value_ordering.order(self.problem, variable);
        self.stack.push(Frame {
            variable,
            values,
            next: 0,
            assigned: false,
            saved_domains: None,
        });
    }
}

fn undo<V: Value>(
    problem: &mut ConstraintProblem<V>,
    history: &mut ActionHistory<V>,
    frame: &mut Frame<V>,
) {
    problem.unassign(frame.variable);
    history.unassigned(frame.variable);
    frame.assigned = false;
    if let Some(saved) = frame.saved_domains.take() {
        problem.restore_domains(saved);
    }
}
