//! Detached snapshots of a problem's variable values.

use std::ops::Index;

use super::variable::{Value, VariableId};

/// One optional value per variable of a problem, indexed by [`VariableId`].
///
/// Local search and genetic search operate on these snapshots and only
/// install the chosen one into the problem at the end.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment<V> {
    values: Vec<Option<V>>,
}

impl<V: Value> Assignment<V> {
    /// An assignment of `len` unassigned variables.
    pub fn unassigned(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, variable: VariableId) -> Option<&V> {
        self.values.get(variable.0).and_then(Option::as_ref)
    }

    /// Sets or clears the value of `variable`.
    ///
    /// # Panics
    ///
    /// Panics if `variable` is outside the snapshot.
    pub fn set(&mut self, variable: VariableId, value: Option<V>) {
        self.values[variable.0] = value;
    }

    /// Whether every variable has a value.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    pub fn assigned_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableId, Option<&V>)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (VariableId(i), v.as_ref()))
    }
}

impl<V> Index<VariableId> for Assignment<V> {
    type Output = Option<V>;

    fn index(&self, variable: VariableId) -> &Option<V> {
        &self.values[variable.0]
    }
}

impl<V> FromIterator<Option<V>> for Assignment<V> {
    fn from_iter<I: IntoIterator<Item = Option<V>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
