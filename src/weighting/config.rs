//! Constraint weighting configuration.

use std::collections::HashSet;

use crate::model::VariableId;

/// Configuration for [`WeightingRunner`](super::WeightingRunner).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightingConfig {
    /// Random restarts. Weights carry over from one try to the next.
    pub max_tries: usize,

    /// Variables never reassigned, in addition to those assigned on entry.
    pub read_only: HashSet<VariableId>,

    /// Record every assign/unassign into the result.
    pub with_history: bool,

    pub seed: Option<u64>,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            max_tries: 10,
            read_only: HashSet::new(),
            with_history: false,
            seed: None,
        }
    }
}

impl WeightingConfig {
    pub fn with_max_tries(mut self, n: usize) -> Self {
        self.max_tries = n;
        self
    }

    pub fn with_read_only(mut self, variables: impl IntoIterator<Item = VariableId>) -> Self {
        self.read_only = variables.into_iter().collect();
        self
    }

    pub fn with_history(mut self, enabled: bool) -> Self {
        self.with_history = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tries == 0 {
            return Err("max_tries must be positive".into());
        }
        Ok(())
    }
}
