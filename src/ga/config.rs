//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use std::collections::HashSet;

use crate::model::VariableId;

/// Configuration for genetic local search.
///
/// # Defaults
///
/// ```
/// use u_csp::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_csp::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(40)
///     .with_max_generations(200)
///     .with_mutation_probability(0.2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals in the population.
    ///
    /// Half truncation keeps half of them as parents, so at least 4 are
    /// needed to leave two parents.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Probability that an individual of a new generation is mutated
    /// (0.0 to 1.0).
    pub mutation_probability: f64,

    /// Variables never reassigned, in addition to those assigned on entry.
    pub read_only: HashSet<VariableId>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            mutation_probability: 0.1,
            read_only: HashSet::new(),
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn with_read_only(mut self, variables: impl IntoIterator<Item = VariableId>) -> Self {
        self.read_only = variables.into_iter().collect();
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 4 {
            return Err("population_size must be at least 4".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(format!(
                "mutation_probability must be in [0, 1], got {}",
                self.mutation_probability
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 500);
        assert!((config.mutation_probability - 0.1).abs() < 1e-10);
        assert!(config.read_only.is_empty());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = GaConfig::default().with_max_generations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_mutation_probability() {
        let config = GaConfig::default().with_mutation_probability(2.0);
        assert!((config.mutation_probability - 1.0).abs() < 1e-10);
        let config = GaConfig {
            mutation_probability: -0.5,
            ..GaConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
