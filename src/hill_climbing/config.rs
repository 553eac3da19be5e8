//! Hill climbing configuration.

use std::collections::HashSet;

use crate::model::VariableId;

/// Configuration for [`HillClimbingRunner`](super::HillClimbingRunner).
///
/// # Examples
///
/// ```
/// use u_csp::hill_climbing::HillClimbingConfig;
///
/// let config = HillClimbingConfig::default()
///     .with_max_restarts(20)
///     .with_max_steps(200)
///     .with_max_successors(30)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HillClimbingConfig {
    /// Starting states tried, the first one included.
    pub max_restarts: usize,

    /// Moves per restart.
    pub max_steps: usize,

    /// Successors sampled per move before the climb is declared stuck.
    pub max_successors: usize,

    /// Variables never reassigned, in addition to those assigned on entry.
    pub read_only: HashSet<VariableId>,

    pub seed: Option<u64>,
}

impl Default for HillClimbingConfig {
    fn default() -> Self {
        Self {
            max_restarts: 10,
            max_steps: 100,
            max_successors: 50,
            read_only: HashSet::new(),
            seed: None,
        }
    }
}

impl HillClimbingConfig {
    pub fn with_max_restarts(mut self, n: usize) -> Self {
        self.max_restarts = n;
        self
    }

    pub fn with_max_steps(mut self, n: usize) -> Self {
        self.max_steps = n;
        self
    }

    pub fn with_max_successors(mut self, n: usize) -> Self {
        self.max_successors = n;
        self
    }

    pub fn with_read_only(mut self, variables: impl IntoIterator<Item = VariableId>) -> Self {
        self.read_only = variables.into_iter().collect();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_restarts == 0 {
            return Err("max_restarts must be positive".into());
        }
        if self.max_steps == 0 {
            return Err("max_steps must be positive".into());
        }
        if self.max_successors == 0 {
            return Err("max_successors must be positive".into());
        }
        Ok(())
    }
}
