//! Backtracking configuration.

use super::heuristics::{Inference, ValueOrdering, VariableSelection};

/// Configuration for [`BacktrackingRunner`](super::BacktrackingRunner).
///
/// The default is plain chronological backtracking: first unassigned
/// variable, values in domain order, no inference.
///
/// # Examples
///
/// ```
/// use u_csp::search::{BacktrackingConfig, Inference};
///
/// let config = BacktrackingConfig::heuristic().with_inference(Inference::ForwardChecking);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktrackingConfig {
    /// Rule choosing the next variable.
    pub primary: VariableSelection,

    /// Rule applied to the variables the primary rule ties on. Remaining
    /// ties go to the variable added first.
    pub tie_breaker: Option<VariableSelection>,

    pub value_ordering: ValueOrdering,

    pub inference: Inference,

    /// Record every assign/unassign into the result.
    pub with_history: bool,
}

impl Default for BacktrackingConfig {
    fn default() -> Self {
        Self {
            primary: VariableSelection::FirstUnassigned,
            tie_breaker: None,
            value_ordering: ValueOrdering::DomainOrder,
            inference: Inference::None,
            with_history: false,
        }
    }
}

impl BacktrackingConfig {
    /// MRV with Degree as tie-breaker and least-constraining values.
    pub fn heuristic() -> Self {
        Self {
            primary: VariableSelection::MinimumRemainingValues,
            tie_breaker: Some(VariableSelection::Degree),
            value_ordering: ValueOrdering::LeastConstrainingValue,
            ..Self::default()
        }
    }

    pub fn with_primary(mut self, selection: VariableSelection) -> Self {
        self.primary = selection;
        self
    }

    pub fn with_tie_breaker(mut self, selection: VariableSelection) -> Self {
        self.tie_breaker = Some(selection);
        self
    }

    pub fn without_tie_breaker(mut self) -> Self {
        self.tie_breaker = None;
        self
    }

    pub fn with_value_ordering(mut self, ordering: ValueOrdering) -> Self {
        self.value_ordering = ordering;
        self
    }

    pub fn with_inference(mut self, inference: Inference) -> Self {
        self.inference = inference;
        self
    }

    pub fn with_history(mut self, enabled: bool) -> Self {
        self.with_history = enabled;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        match self.tie_breaker {
            Some(tie) if tie == self.primary => {
                Err(format!("tie_breaker {tie:?} repeats the primary selection"))
            }
            Some(_) if self.primary == VariableSelection::FirstUnassigned => {
                Err("FirstUnassigned never ties; drop the tie_breaker".into())
            }
            _ => Ok(()),
        }
    }
}
