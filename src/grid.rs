//! Block-structured square grids (Sudoku-like problems).
//!
//! A grid problem has `n * n` variables in row-major order, where `n` is
//! itself a perfect square. Each row, column and `√n × √n` block must hold
//! `n` different symbols. Grid-aware local search and genetic strategies
//! keep every block a permutation of the symbols and only move values
//! within a block.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{CspError, Result};
use crate::model::{evaluators, Assignment, ConstraintProblem, Value, Variable, VariableId};

/// Shape and symbols of a grid problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout<V> {
    size: usize,
    block: usize,
    symbols: Vec<V>,
}

impl<V: Value> GridLayout<V> {
    /// Reads the layout of `problem`: the variable count must be the square
    /// of a perfect square and the domains together must hold exactly `n`
    /// symbols.
    ///
    /// # Errors
    ///
    /// [`CspError::InvalidGrid`] otherwise.
    pub fn new(problem: &ConstraintProblem<V>) -> Result<Self> {
        let count = problem.variable_count();
        let size = exact_sqrt(count)
            .filter(|&n| n > 0)
            .ok_or_else(|| CspError::InvalidGrid(format!("{count} variables do not form a square")))?;
        let block = exact_sqrt(size)
            .ok_or_else(|| CspError::InvalidGrid(format!("side {size} is not a perfect square")))?;

        let mut symbols = Vec::new();
        for id in problem.variables() {
            for value in problem.domain(id) {
                if !symbols.contains(value) {
                    symbols.push(value.clone());
                }
            }
        }
        if symbols.len() != size {
            return Err(CspError::InvalidGrid(format!(
                "{} symbols across the domains, expected {size}",
                symbols.len()
            )));
        }
        Ok(Self {
            size,
            block,
            symbols,
        })
    }

    /// Side length `n`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Block side length `√n`.
    pub fn block_size(&self) -> usize {
        self.block
    }

    pub fn symbols(&self) -> &[V] {
        &self.symbols
    }

    pub fn cell(&self, row: usize, column: usize) -> VariableId {
        VariableId(row * self.size + column)
    }

    pub fn row(&self, row: usize) -> Vec<VariableId> {
        (0..self.size).map(|c| self.cell(row, c)).collect()
    }

    pub fn column(&self, column: usize) -> Vec<VariableId> {
        (0..self.size).map(|r| self.cell(r, column)).collect()
    }

    /// Cells of block `index`, blocks numbered row-major.
    pub fn block(&self, index: usize) -> Vec<VariableId> {
        let top = index / self.block * self.block;
        let left = index % self.block * self.block;
        (top..top + self.block)
            .flat_map(|r| (left..left + self.block).map(move |c| (r, c)))
            .map(|(r, c)| self.cell(r, c))
            .collect()
    }

    /// Number of distinct values in each row plus each column.
    pub fn distinct_score(&self, state: &Assignment<V>) -> usize {
        let distinct = |cells: Vec<VariableId>| {
            cells
                .iter()
                .filter_map(|&id| state.get(id))
                .collect::<HashSet<_>>()
                .len()
        };
        (0..self.size)
            .map(|i| distinct(self.row(i)) + distinct(self.column(i)))
            .sum()
    }

    /// Fills the cells outside `read_only` so every block holds each symbol
    /// once. Values already held by read-only cells stay in place.
    ///
    /// # Errors
    ///
    /// [`CspError::InvalidGrid`] if some cell's domain admits none of the
    /// symbols its block still needs.
    pub fn fill_blocks<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        state: &mut Assignment<V>,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> Result<()> {
        for b in 0..self.size {
            let cells = self.block(b);
            let taken: HashSet<&V> = cells
                .iter()
                .filter(|&&id| read_only.contains(&id))
                .filter_map(|&id| state.get(id))
                .collect();
            let mut missing: Vec<V> = self
                .symbols
                .iter()
                .filter(|s| !taken.contains(s))
                .cloned()
                .collect();
            missing.shuffle(rng);
            for id in cells.into_iter().filter(|id| !read_only.contains(id)) {
                let position = missing
                    .iter()
                    .position(|s| problem.variable(id).contains(s))
                    .ok_or_else(|| {
                        CspError::InvalidGrid(format!("block {b} cannot complete cell {id}"))
                    })?;
                state.set(id, Some(missing.swap_remove(position)));
            }
        }
        Ok(())
    }

    /// Swaps the values of two free cells of a random block, provided each
    /// value lies in the other cell's domain. Returns whether a swap
    /// happened.
    pub fn swap_in_block<R: Rng + ?Sized>(
        &self,
        problem: &ConstraintProblem<V>,
        state: &mut Assignment<V>,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> bool {
        let b = rng.random_range(0..self.size);
        let mut cells: Vec<VariableId> = self
            .block(b)
            .into_iter()
            .filter(|id| !read_only.contains(id))
            .collect();
        cells.shuffle(rng);
        for (i, &a) in cells.iter().enumerate() {
            for &c in &cells[i + 1..] {
                let (Some(va), Some(vc)) = (state.get(a).cloned(), state.get(c).cloned()) else {
                    continue;
                };
                if problem.variable(a).contains(&vc) && problem.variable(c).contains(&va) {
                    state.set(a, Some(vc));
                    state.set(c, Some(va));
                    return true;
                }
            }
        }
        false
    }
}

/// Builds a grid problem over `symbols`: one variable per cell of `givens`
/// (row-major), given cells fixed to their value, and an all-different
/// constraint on every row, column and block.
///
/// # Errors
///
/// [`CspError::InvalidGrid`] if the cell count is not `n * n` with `n` a
/// perfect square equal to the number of symbols, or a given is not a
/// symbol.
///
/// # Examples
///
/// ```
/// use u_csp::grid::grid_problem;
///
/// let givens = [
///     Some(1), None, None, None,
///     None, None, Some(3), None,
///     None, Some(4), None, None,
///     None, None, None, Some(2),
/// ];
/// let problem = grid_problem(vec![1, 2, 3, 4], &givens).unwrap();
/// assert_eq!(problem.variable_count(), 16);
/// assert_eq!(problem.constraint_count(), 12);
/// ```
pub fn grid_problem<V: Value>(symbols: Vec<V>, givens: &[Option<V>]) -> Result<ConstraintProblem<V>> {
    let size = symbols.len();
    if size * size != givens.len() || exact_sqrt(size).is_none() || size == 0 {
        return Err(CspError::InvalidGrid(format!(
            "{} cells cannot hold a grid of {size} symbols",
            givens.len()
        )));
    }
    let mut problem = ConstraintProblem::new();
    for given in givens {
        let variable = match given {
            Some(value) if symbols.contains(value) => {
                Variable::with_value([value.clone()], value.clone())
                    .map_err(|e| CspError::InvalidGrid(e.to_string()))?
            }
            Some(value) => {
                return Err(CspError::InvalidGrid(format!("given {value:?} is not a symbol")));
            }
            None => Variable::new(symbols.iter().cloned()),
        };
        problem.add_variable(variable);
    }

    let layout = GridLayout::new(&problem)?;
    let groups = (0..size).flat_map(|i| [layout.row(i), layout.column(i), layout.block(i)]);
    for cells in groups {
        problem.add_constraint(cells, evaluators::all_different())?;
    }
    Ok(problem)
}

fn exact_sqrt(n: usize) -> Option<usize> {
    let root = (n as f64).sqrt().round() as usize;
    (root * root == n).then_some(root)
}
