//! Seeded random number generation shared by the stochastic algorithms.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates the generator used by one algorithm run.
///
/// A fixed seed makes runs reproducible; `None` draws a fresh seed.
pub(crate) fn create_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}
