//! Problem model: variables, constraints and the problem that owns them.
//!
//! Variables live in an arena owned by [`ConstraintProblem`]; constraints and
//! the derived indexes hold copyable [`VariableId`] / [`ConstraintId`]
//! handles, so an assignment made through the problem is visible to every
//! constraint without any shared mutable aliasing.

mod assignment;
mod constraint;
pub mod evaluators;
mod history;
mod problem;
mod variable;

pub use assignment::Assignment;
pub use constraint::{ConsistencyTable, Constraint, ConstraintId, Evaluator};
pub use history::{Action, ActionHistory};
pub use problem::ConstraintProblem;
pub use variable::{Value, Variable, VariableId};
