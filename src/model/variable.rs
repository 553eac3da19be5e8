//! CSP variable type.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::error::VariableError;

/// Values a variable's domain may hold.
///
/// Blanket-implemented for every owned `Clone + Eq + Hash + Debug` type, so
/// integers, chars, `&'static str`, `String` and small tuples all work.
pub trait Value: Clone + Eq + Hash + fmt::Debug + 'static {}

impl<T: Clone + Eq + Hash + fmt::Debug + 'static> Value for T {}

/// Handle of a variable inside a [`ConstraintProblem`](super::ConstraintProblem).
///
/// Two variables with identical domains are still distinct: identity is the
/// slot in the problem's arena, never the domain contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableId(pub(crate) usize);

impl VariableId {
    /// Position of the variable in its problem's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A single unknown with a finite domain and an optional current value.
///
/// Invariants:
/// - the domain never contains duplicates (first occurrence wins);
/// - a present value is always a member of the domain;
/// - an assigned variable must be [`unassign`](Variable::unassign)ed before it
///   can be assigned again.
///
/// # Examples
///
/// ```
/// use u_csp::model::Variable;
///
/// let mut v = Variable::new([1, 2, 2, 3]);
/// assert_eq!(v.domain(), &[1, 2, 3]);
///
/// v.assign(2).unwrap();
/// assert_eq!(v.value(), Some(&2));
/// assert!(v.assign(3).is_err());
///
/// v.unassign();
/// assert!(!v.is_assigned());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable<V> {
    domain: Vec<V>,
    value: Option<V>,
}

impl<V: Value> Variable<V> {
    /// Creates an unassigned variable. Duplicate domain values are dropped.
    pub fn new(domain: impl IntoIterator<Item = V>) -> Self {
        Self {
            domain: dedup(domain),
            value: None,
        }
    }

    /// Creates a variable already assigned to `value`.
    pub fn with_value(
        domain: impl IntoIterator<Item = V>,
        value: V,
    ) -> Result<Self, VariableError> {
        let mut variable = Self::new(domain);
        variable.assign(value)?;
        Ok(variable)
    }

    /// The current domain, in declaration order.
    pub fn domain(&self) -> &[V] {
        &self.domain
    }

    /// The current value, if assigned.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Whether the variable holds a value.
    pub fn is_assigned(&self) -> bool {
        self.value.is_some()
    }

    /// Whether `value` is a member of the domain.
    pub fn contains(&self, value: &V) -> bool {
        self.domain.contains(value)
    }

    /// Assigns `value`.
    ///
    /// Fails without changing anything if the variable is already assigned
    /// or if `value` is not in the domain.
    pub fn assign(&mut self, value: V) -> Result<(), VariableError> {
        if let Some(current) = &self.value {
            return Err(VariableError::OverAssignment {
                current: format!("{current:?}"),
            });
        }
        if !self.domain.contains(&value) {
            return Err(VariableError::UncontainedValue {
                value: format!("{value:?}"),
            });
        }
        self.value = Some(value);
        Ok(())
    }

    /// Clears the current value. A no-op on an unassigned variable.
    pub fn unassign(&mut self) {
        self.value = None;
    }

    /// Removes `value` from the domain, returning whether it was present.
    ///
    /// Callers never pass the current value: propagation only revises
    /// unassigned variables and the public path goes through
    /// [`ConstraintProblem::remove_from_domain`](super::ConstraintProblem::remove_from_domain).
    pub(crate) fn remove_from_domain(&mut self, value: &V) -> bool {
        match self.domain.iter().position(|v| v == value) {
            Some(pos) => {
                self.domain.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Keeps only the domain values for which `keep` returns true.
    pub(crate) fn retain_domain(&mut self, mut keep: impl FnMut(&V) -> bool) {
        self.domain.retain(|v| keep(v));
    }

    /// Puts back a domain previously read from this variable.
    pub(crate) fn restore_domain(&mut self, domain: Vec<V>) {
        self.domain = domain;
    }

    /// Replaces the domain, e.g. to restore a snapshot.
    ///
    /// Rejected if the variable is assigned to a value outside the new domain.
    pub fn set_domain(&mut self, domain: impl IntoIterator<Item = V>) -> Result<(), VariableError> {
        let domain = dedup(domain);
        if let Some(current) = &self.value {
            if !domain.contains(current) {
                return Err(VariableError::UncontainedValue {
                    value: format!("{current:?}"),
                });
            }
        }
        self.domain = domain;
        Ok(())
    }
}

fn dedup<V: Value>(values: impl IntoIterator<Item = V>) -> Vec<V> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_removes_duplicates_keeping_order() {
        let v = Variable::new(["b", "a", "b", "c", "a"]);
        assert_eq!(v.domain(), &["b", "a", "c"]);
        assert!(!v.is_assigned());
    }

    #[test]
    fn test_with_value() {
        let v = Variable::with_value([1, 2, 3], 3).unwrap();
        assert_eq!(v.value(), Some(&3));

        let err = Variable::with_value([1, 2, 3], 4).unwrap_err();
        assert!(matches!(err, VariableError::UncontainedValue { .. }));
    }

    #[test]
    fn test_over_assignment_is_rejected() {
        let mut v = Variable::new([1, 2]);
        v.assign(1).unwrap();
        let err = v.assign(2).unwrap_err();
        assert_eq!(
            err,
            VariableError::OverAssignment {
                current: "1".into()
            }
        );
        assert_eq!(v.value(), Some(&1));
    }

    #[test]
    fn test_uncontained_value_leaves_variable_unchanged() {
        let mut v = Variable::new([1, 2]);
        assert!(v.assign(9).is_err());
        assert!(!v.is_assigned());
    }

    #[test]
    fn test_remove_from_domain() {
        let mut v = Variable::new([1, 2, 3]);
        assert!(v.remove_from_domain(&2));
        assert!(!v.remove_from_domain(&2));
        assert_eq!(v.domain(), &[1, 3]);
    }

    #[test]
    fn test_set_domain_rejects_dropping_current_value() {
        let mut v = Variable::with_value([1, 2, 3], 2).unwrap();
        assert!(v.set_domain([1, 3]).is_err());
        assert_eq!(v.domain(), &[1, 2, 3]);
        v.set_domain([2, 2, 5]).unwrap();
        assert_eq!(v.domain(), &[2, 5]);
    }

    proptest! {
        #[test]
        fn prop_domain_has_no_duplicates(values in prop::collection::vec(0u8..16, 0..40)) {
            let v = Variable::new(values.clone());
            let unique: HashSet<_> = v.domain().iter().collect();
            prop_assert_eq!(unique.len(), v.domain().len());
            for x in &values {
                prop_assert!(v.contains(x));
            }
        }

        #[test]
        fn prop_assign_then_unassign(values in prop::collection::vec(0u8..16, 1..20), pick in any::<prop::sample::Index>()) {
            let mut v = Variable::new(values.clone());
            let chosen = values[pick.index(values.len())];
            v.assign(chosen).unwrap();
            prop_assert_eq!(v.value(), Some(&chosen));
            v.unassign();
            prop_assert_eq!(v.value(), None);
        }
    }
}
