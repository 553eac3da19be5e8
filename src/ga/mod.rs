//! Genetic local search.
//!
//! Evolves a population of complete assignments until one of them satisfies
//! every constraint or the generation budget runs out. The representation
//! and operators come from a [`GeneticProblem`] strategy.
//!
//! # Key Types
//!
//! - [`GeneticProblem`]: population generation, fitness, selection,
//!   reproduction and mutation
//! - [`GeneralGenetic`]: strategy for any problem
//! - [`GridGenetic`]: block-preserving strategy for grid puzzles
//! - [`GaConfig`]: population size, generations, mutation probability
//! - [`GaRunner`]: executes the evolutionary loop
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod general;
mod grid;
mod runner;
mod types;

pub use config::GaConfig;
pub use general::GeneralGenetic;
pub use grid::GridGenetic;
pub use runner::{GaResult, GaRunner};
pub use types::GeneticProblem;
