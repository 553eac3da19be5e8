//! Annealing parameters and cooling schedules.

use std::collections::HashSet;

use crate::model::VariableId;

/// How the temperature falls after each cooling step.
///
/// # References
///
/// - Geometric: Kirkpatrick, Gelatt & Vecchi (1983)
/// - LundyMees: Lundy & Mees (1986)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// `T <- T * rate`. With the default of one step per temperature this is
    /// the classic per-step cooling rate; `rate = 1` keeps T constant.
    Geometric { rate: f64 },

    /// Falls in equal decrements from the initial temperature to the floor
    /// over the whole step budget.
    Linear,

    /// `T <- T / (1 + beta * T)`: fast while hot, slow when cold.
    LundyMees { beta: f64 },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { rate: 0.99 }
    }
}

/// Parameters of [`SaRunner`](super::SaRunner).
///
/// The run ends when the current state is a solution or after
/// `max_steps` successor evaluations, whichever comes first.
///
/// ```
/// use u_csp::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(5.0)
///     .with_cooling_rate(0.995)
///     .with_max_steps(5000)
///     .with_seed(1);
/// assert_eq!(config.cooling, CoolingSchedule::Geometric { rate: 0.995 });
/// assert_eq!(config.steps_per_temperature, 1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Temperature of the first step.
    pub initial_temperature: f64,

    pub cooling: CoolingSchedule,

    /// Successor evaluations before the run gives up.
    pub max_steps: usize,

    /// Steps between two cooling steps. 1 cools after every step.
    pub steps_per_temperature: usize,

    /// Lower bound on the temperature. Reaching it does not end the run:
    /// annealing continues at the floor until solved or out of steps.
    pub temperature_floor: f64,

    /// Variables never reassigned, in addition to those assigned on entry.
    pub read_only: HashSet<VariableId>,

    /// `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 10.0,
            cooling: CoolingSchedule::default(),
            max_steps: 10_000,
            steps_per_temperature: 1,
            temperature_floor: 1e-3,
            read_only: HashSet::new(),
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    /// Shorthand for geometric cooling at `rate`.
    pub fn with_cooling_rate(self, rate: f64) -> Self {
        self.with_cooling(CoolingSchedule::Geometric { rate })
    }

    pub fn with_max_steps(mut self, n: usize) -> Self {
        self.max_steps = n;
        self
    }

    pub fn with_steps_per_temperature(mut self, n: usize) -> Self {
        self.steps_per_temperature = n;
        self
    }

    pub fn with_temperature_floor(mut self, t: f64) -> Self {
        self.temperature_floor = t;
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

    /// Checks every parameter, describing the first bad one.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_steps == 0 {
            return Err("max_steps must be at least 1".into());
        }
        if self.steps_per_temperature == 0 {
            return Err("steps_per_temperature must be at least 1".into());
        }
        if self.temperature_floor.is_nan() || self.temperature_floor <= 0.0 {
            return Err(format!(
                "temperature_floor must be positive, got {}",
                self.temperature_floor
            ));
        }
        if self.initial_temperature.is_nan() || self.initial_temperature <= self.temperature_floor {
            return Err(format!(
                "initial_temperature {} must exceed the floor {}",
                self.initial_temperature, self.temperature_floor
            ));
        }
        match self.cooling {
            CoolingSchedule::Geometric { rate } if !(rate > 0.0 && rate <= 1.0) => {
                Err(format!("cooling rate must be in (0, 1], got {rate}"))
            }
            CoolingSchedule::LundyMees { beta } if beta.is_nan() || beta <= 0.0 => {
                Err(format!("lundy-mees beta must be positive, got {beta}"))
            }
            _ => Ok(()),
        }
    }
}
