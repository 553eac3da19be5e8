//! Assign/unassign action log.

use super::variable::{Value, VariableId};

/// One step taken by a search: `value` is `None` for an unassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action<V> {
    pub variable: VariableId,
    pub value: Option<V>,
}

/// Ordered log of the actions of a single algorithm run.
///
/// A disabled history ignores everything recorded into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionHistory<V> {
    enabled: bool,
    actions: Vec<Action<V>>,
}

impl<V: Value> ActionHistory<V> {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            actions: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn assigned(&mut self, variable: VariableId, value: &V) {
        if self.enabled {
            self.actions.push(Action {
                variable,
                value: Some(value.clone()),
            });
        }
    }

    pub(crate) fn unassigned(&mut self, variable: VariableId) {
        if self.enabled {
            self.actions.push(Action {
                variable,
                value: None,
            });
        }
    }

    pub fn actions(&self) -> &[Action<V>] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn into_actions(self) -> Vec<Action<V>> {
        self.actions
    }
}
