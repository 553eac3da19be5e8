//! Stock constraint evaluators.
//!
//! Each function returns a closure ready to pass to
//! [`ConstraintProblem::add_constraint`](super::ConstraintProblem::add_constraint).
//!
//! Constraints are also evaluated on partial tuples holding only the
//! assigned values of their scope. [`always_satisfied`], [`all_different`]
//! and [`all_equal`] reject a partial tuple only when it already breaks the
//! relation; [`max_sum`] behaves the same for non-negative values, and
//! [`exact_length_exact_sum`] accepts every tuple shorter than its length.
//! [`exact_sum`] and [`min_sum`] judge whatever values they are given: a
//! partial tuple whose sum misses the target is rejected even though later
//! values could fix it. Backtracking, forward checking and arc consistency
//! then discard such prefixes, so use them only where every scope variable
//! is assigned before the check matters, or prefer [`exact_length_exact_sum`].

use std::cmp::Ordering;
use std::collections::HashSet;
use std::iter::Sum;

use super::variable::Value;

/// Accepts every tuple.
pub fn always_satisfied<V: Value>() -> impl Fn(&[V]) -> bool {
    |_: &[V]| true
}

/// Rejects every tuple, including the empty one.
pub fn never_satisfied<V: Value>() -> impl Fn(&[V]) -> bool {
    |_: &[V]| false
}

/// Accepts tuples whose values are pairwise distinct.
pub fn all_different<V: Value>() -> impl Fn(&[V]) -> bool {
    |values: &[V]| {
        let mut seen = HashSet::with_capacity(values.len());
        values.iter().all(|v| seen.insert(v))
    }
}

/// Accepts tuples whose values are all equal.
pub fn all_equal<V: Value>() -> impl Fn(&[V]) -> bool {
    |values: &[V]| values.windows(2).all(|w| w[0] == w[1])
}

/// Accepts tuples whose sum is strictly below `maximum`.
pub fn max_sum<T>(maximum: T) -> impl Fn(&[T]) -> bool
where
    T: Value + Copy + Sum + PartialOrd,
{
    move |values: &[T]| values.iter().copied().sum::<T>() < maximum
}

/// Accepts tuples whose sum is strictly above `minimum`. Rejects partial
/// tuples that have not yet passed it.
pub fn min_sum<T>(minimum: T) -> impl Fn(&[T]) -> bool
where
    T: Value + Copy + Sum + PartialOrd,
{
    move |values: &[T]| minimum < values.iter().copied().sum::<T>()
}

/// Accepts tuples whose sum equals `target`. Rejects partial tuples
/// that fall short of it.
pub fn exact_sum<T>(target: T) -> impl Fn(&[T]) -> bool
where
    T: Value + Copy + Sum,
{
    move |values: &[T]| values.iter().copied().sum::<T>() == target
}

/// Accepts any tuple shorter than `length`, a tuple of exactly `length`
/// values summing to `target`, and nothing longer.
pub fn exact_length_exact_sum<T>(length: usize, target: T) -> impl Fn(&[T]) -> bool
where
    T: Value + Copy + Sum,
{
    move |values: &[T]| match values.len().cmp(&length) {
        Ordering::Less => true,
        Ordering::Equal => values.iter().copied().sum::<T>() == target,
        Ordering::Greater => false,
    }
}
