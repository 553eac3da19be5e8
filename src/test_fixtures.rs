//! Problems shared by the unit tests of several modules.

use std::collections::HashMap;

use crate::model::{evaluators, ConstraintProblem, VariableId};

pub(crate) const REGIONS: [&str; 7] = ["wa", "nt", "q", "nsw", "v", "sa", "t"];

const BORDERS: [(&str, &str); 9] = [
    ("sa", "wa"),
    ("sa", "nt"),
    ("sa", "q"),
    ("sa", "nsw"),
    ("sa", "v"),
    ("wa", "nt"),
    ("nt", "q"),
    ("q", "nsw"),
    ("nsw", "v"),
];

/// Australia map coloring: seven regions, nine borders and an always-true
/// unary constraint on Tasmania.
pub(crate) fn map_coloring(
    colors: &[&'static str],
) -> (ConstraintProblem<&'static str>, HashMap<&'static str, VariableId>) {
    let mut problem = ConstraintProblem::new();
    let ids = problem
        .add_named_variables(REGIONS, colors.iter().copied())
        .unwrap();
    let names: HashMap<_, _> = REGIONS.into_iter().zip(ids).collect();
    for (a, b) in BORDERS {
        problem
            .add_constraint([names[a], names[b]], evaluators::all_different())
            .unwrap();
    }
    problem
        .add_constraint([names["t"]], evaluators::always_satisfied())
        .unwrap();
    (problem, names)
}

/// `n` queens, one variable per column holding the queen's row.
pub(crate) fn n_queens(n: usize) -> ConstraintProblem<usize> {
    let mut problem = ConstraintProblem::new();
    let columns = problem.add_variables(n, 0..n);
    for i in 0..n {
        for j in i + 1..n {
            let distance = j - i;
            problem
                .add_constraint([columns[i], columns[j]], move |rows: &[usize]| {
                    rows.len() < 2 || (rows[0] != rows[1] && rows[0].abs_diff(rows[1]) != distance)
                })
                .unwrap();
        }
    }
    problem
}

fn divides(values: &[i32]) -> bool {
    values.len() < 2 || values[0] % values[1] == 0
}

/// x{2,5} and y{2,4} must each be divisible by z{2,5}.
pub(crate) fn divisor_chain() -> (ConstraintProblem<i32>, [VariableId; 3]) {
    let mut problem = ConstraintProblem::new();
    let x = problem.add_variable(crate::model::Variable::new([2, 5]));
    let y = problem.add_variable(crate::model::Variable::new([2, 4]));
    let z = problem.add_variable(crate::model::Variable::new([2, 5]));
    problem.add_constraint([x, z], divides).unwrap();
    problem.add_constraint([y, z], divides).unwrap();
    (problem, [x, y, z])
}

/// x < y over {1, 2, 3}.
pub(crate) fn less_than_pair() -> (ConstraintProblem<i32>, [VariableId; 2]) {
    let mut problem = ConstraintProblem::new();
    let ids = problem.add_variables(2, [1, 2, 3]);
    problem
        .add_constraint(ids.clone(), |v: &[i32]| v.len() < 2 || v[0] < v[1])
        .unwrap();
    (problem, [ids[0], ids[1]])
}

/// The union of all current domains.
pub(crate) fn domain_union<V: crate::model::Value + Ord>(
    problem: &ConstraintProblem<V>,
) -> std::collections::BTreeSet<V> {
    problem
        .variables()
        .flat_map(|id| problem.domain(id).to_vec())
        .collect()
}

/// A solved 4x4 grid, row-major.
pub(crate) const FOUR_BY_FOUR_SOLUTION: [u8; 16] = [
    1, 2, 3, 4, //
    3, 4, 1, 2, //
    2, 1, 4, 3, //
    4, 3, 2, 1,
];

/// 4x4 grid problem with one given per block, taken from
/// [`FOUR_BY_FOUR_SOLUTION`].
pub(crate) fn four_by_four() -> ConstraintProblem<u8> {
    let givens: Vec<Option<u8>> = FOUR_BY_FOUR_SOLUTION
        .iter()
        .enumerate()
        .map(|(i, &v)| [0, 7, 9, 14].contains(&i).then_some(v))
        .collect();
    crate::grid::grid_problem(vec![1, 2, 3, 4], &givens).unwrap()
}
