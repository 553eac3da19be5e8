//! Constraint type: an ordered scope, an evaluator and recorded
//! joint-assignment tables.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::Rc;

use super::variable::{Value, VariableId};

/// Handle of a constraint inside a [`ConstraintProblem`](super::ConstraintProblem).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    /// Position of the constraint in its problem.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Predicate over the values of the currently assigned members of a
/// constraint, in declared order.
///
/// It is called with every prefix length from 0 up to the arity and must only
/// reject a partial tuple that can never be extended into a satisfying one.
pub type Evaluator<V> = Rc<dyn Fn(&[V]) -> bool>;

/// Joint assignments recorded for a sorted scope of variables. Each tuple
/// lists one value per scope variable, in scope order.
pub type ConsistencyTable<V> = HashSet<Vec<V>>;

/// A predicate over an ordered tuple of distinct variables.
///
/// A constraint does not own its variables; it stores their handles and is
/// evaluated through a lookup supplied by the owning problem. This lets the
/// problem evaluate the same constraint against the live state, against a
/// hypothetical override, or against a detached [`Assignment`](super::Assignment).
#[derive(Clone)]
pub struct Constraint<V> {
    variables: Vec<VariableId>,
    evaluator: Evaluator<V>,
    recorded: BTreeMap<Vec<VariableId>, ConsistencyTable<V>>,
}

impl<V: Value> Constraint<V> {
    pub(crate) fn new(variables: Vec<VariableId>, evaluator: Evaluator<V>) -> Self {
        Self {
            variables,
            evaluator,
            recorded: BTreeMap::new(),
        }
    }

    /// Member variables in declared order.
    pub fn variables(&self) -> &[VariableId] {
        &self.variables
    }

    pub fn arity(&self) -> usize {
        self.variables.len()
    }

    pub fn contains(&self, variable: VariableId) -> bool {
        self.variables.contains(&variable)
    }

    /// Tables recorded by i-consistency or path consistency, keyed by their
    /// sorted scope.
    pub fn recorded_tables(&self) -> &BTreeMap<Vec<VariableId>, ConsistencyTable<V>> {
        &self.recorded
    }

    /// Evaluates the constraint with values taken from `lookup`.
    ///
    /// Unassigned members (for which `lookup` yields `None`) are skipped. The
    /// evaluator must accept the assigned values, and for every recorded table
    /// some tuple must agree with all assigned variables of its scope.
    pub(crate) fn accepts<'a>(&self, lookup: impl Fn(VariableId) -> Option<&'a V>) -> bool
    where
        V: 'a,
    {
        let values: Vec<V> = self
            .variables
            .iter()
            .filter_map(|&id| lookup(id).cloned())
            .collect();
        if !(self.evaluator)(&values) {
            return false;
        }
        self.recorded.iter().all(|(scope, table)| {
            table.iter().any(|tuple| {
                scope
                    .iter()
                    .zip(tuple)
                    .all(|(&id, value)| lookup(id).is_none_or(|current| current == value))
            })
        })
    }

    /// Like [`accepts`](Self::accepts), but additionally requires every
    /// member to be assigned.
    pub(crate) fn satisfied_by<'a>(&self, lookup: impl Fn(VariableId) -> Option<&'a V>) -> bool
    where
        V: 'a,
    {
        self.variables.iter().all(|&id| lookup(id).is_some()) && self.accepts(lookup)
    }

    /// Records the joint assignments allowed for `scope`.
    ///
    /// `scope` must be sorted and contained in this constraint. If a table
    /// already exists for the scope, the two are intersected. Recording an
    /// empty table makes the constraint unsatisfiable.
    pub(crate) fn record(&mut self, scope: Vec<VariableId>, table: ConsistencyTable<V>) {
        debug_assert!(scope.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(scope.iter().all(|id| self.variables.contains(id)));
        match self.recorded.get_mut(&scope) {
            Some(existing) => existing.retain(|tuple| table.contains(tuple)),
            None => {
                self.recorded.insert(scope, table);
            }
        }
    }
}

impl<V> fmt::Debug for Constraint<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("variables", &self.variables)
            .field("recorded_scopes", &self.recorded.len())
            .finish_non_exhaustive()
    }
}
