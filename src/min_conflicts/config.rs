//! Min-conflicts configuration.

use std::collections::HashSet;

use crate::model::VariableId;

/// Configuration parameters for min-conflicts.
///
/// # Examples
///
/// ```
/// use u_csp::min_conflicts::MinConflictsConfig;
///
/// let config = MinConflictsConfig::default()
///     .with_max_steps(1000)
///     .with_tabu_size(3)
///     .with_seed(42);
/// assert_eq!(config.max_steps, 1000);
/// assert_eq!(config.tabu_size, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinConflictsConfig {
    /// Maximum number of reassignments.
    pub max_steps: usize,
    /// How many recently reassigned variables are excluded from selection.
    /// 0 disables the tabu list.
    pub tabu_size: usize,
    /// Variables never reassigned, in addition to those assigned on entry.
    pub read_only: HashSet<VariableId>,
    /// Record every assign/unassign into the result.
    pub with_history: bool,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for MinConflictsConfig {
    fn default() -> Self {
        Self {
            max_steps: 1000,
            tabu_size: 0,
            read_only: HashSet::new(),
            with_history: false,
            seed: None,
        }
    }
}

impl MinConflictsConfig {
    pub fn with_max_steps(mut self, n: usize) -> Self {
        self.max_steps = n;
        self
    }

    pub fn with_tabu_size(mut self, size: usize) -> Self {
        self.tabu_size = size;
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
    ///
    /// The bound on `tabu_size` depends on the problem and is checked when
    /// the search starts.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_steps == 0 {
            return Err("max_steps must be positive".into());
        }
        Ok(())
    }
}
