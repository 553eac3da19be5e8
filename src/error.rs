//! Error types.
//!
//! Construction-time and query-time violations are reported through these
//! types. An algorithm that simply finds no solution does not produce an
//! error: it reports `false` or an unsolved result.

use thiserror::Error;

use crate::model::{ConstraintId, VariableId};

/// Convenience alias used throughout the crate.
pub type Result<T, E = CspError> = std::result::Result<T, E>;

/// A violation of a single [`Variable`](crate::model::Variable)'s invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariableError {
    #[error("value {value} is not contained in the variable's domain")]
    UncontainedValue { value: String },
    #[error("variable is already assigned to {current}; it must be unassigned first")]
    OverAssignment { current: String },
    #[error("value {value} is the current value and cannot leave the domain")]
    RemovesCurrentValue { value: String },
}

/// Errors surfaced by the problem model and the algorithms' preconditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CspError {
    #[error("variable {variable}: {source}")]
    Variable {
        variable: VariableId,
        #[source]
        source: VariableError,
    },
    #[error("variable {variable} is not contained in constraint {constraint}")]
    UncontainedVariable {
        constraint: ConstraintId,
        variable: VariableId,
    },
    #[error("variable {0} does not belong to this problem")]
    UnknownVariable(VariableId),
    #[error("a constraint needs at least one variable")]
    EmptyConstraint,
    #[error("variable name {0:?} is already taken")]
    DuplicateName(String),
    #[error("assignment covers {found} variables, the problem has {expected}")]
    AssignmentLength { expected: usize, found: usize },
    #[error("i-consistency level {level} is outside of (0, {variable_count}]")]
    InvalidConsistencyLevel { level: usize, variable_count: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}

impl CspError {
    pub(crate) fn variable(variable: VariableId, source: VariableError) -> Self {
        CspError::Variable { variable, source }
    }
}
