//! The constraint problem: variable arena, constraints and derived indexes.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use log::{debug, warn};
use rand::seq::IndexedRandom;
use rand::Rng;

use super::assignment::Assignment;
use super::constraint::{ConsistencyTable, Constraint, ConstraintId};
use super::variable::{Value, Variable, VariableId};
use crate::error::{CspError, Result, VariableError};

/// A finite-domain constraint satisfaction problem.
///
/// The problem owns every variable; constraints refer to them through
/// [`VariableId`] handles. Two derived indexes are kept in step with the
/// constraint set at all times: the constraints containing each variable,
/// and the neighbor graph (variables are neighbors iff they share a
/// constraint).
///
/// Read accessors taking a [`VariableId`] or [`ConstraintId`] index the
/// arena directly and panic on a handle that did not come from this problem.
///
/// # Examples
///
/// ```
/// use u_csp::model::{evaluators, ConstraintProblem};
///
/// let mut problem = ConstraintProblem::new();
/// let ids = problem.add_named_variables(["a", "b"], ["red", "green"]).unwrap();
/// problem.add_constraint(ids.clone(), evaluators::all_different()).unwrap();
///
/// problem.assign(ids[0], "red").unwrap();
/// assert_eq!(problem.consistent_domain(ids[1]), vec!["green"]);
/// ```
#[derive(Debug, Clone)]
pub struct ConstraintProblem<V> {
    variables: Vec<Variable<V>>,
    constraints: Vec<Constraint<V>>,
    constraints_of: Vec<Vec<ConstraintId>>,
    neighbors: Vec<BTreeSet<VariableId>>,
    names: HashMap<String, VariableId>,
}

impl<V: Value> Default for ConstraintProblem<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Value> ConstraintProblem<V> {
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            constraints: Vec::new(),
            constraints_of: Vec::new(),
            neighbors: Vec::new(),
            names: HashMap::new(),
        }
    }

    // ---- Construction ----

    /// Adds a variable to the arena.
    pub fn add_variable(&mut self, variable: Variable<V>) -> VariableId {
        let id = VariableId(self.variables.len());
        if variable.domain().is_empty() {
            warn!("variable {id} starts with an empty domain");
        }
        self.variables.push(variable);
        self.constraints_of.push(Vec::new());
        self.neighbors.push(BTreeSet::new());
        id
    }

    /// Adds a variable addressable by `name`.
    pub fn add_named_variable(
        &mut self,
        name: impl Into<String>,
        variable: Variable<V>,
    ) -> Result<VariableId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(CspError::DuplicateName(name));
        }
        let id = self.add_variable(variable);
        self.names.insert(name, id);
        Ok(id)
    }

    /// Adds `count` unassigned variables sharing one domain.
    pub fn add_variables(
        &mut self,
        count: usize,
        domain: impl IntoIterator<Item = V>,
    ) -> Vec<VariableId> {
        let domain: Vec<V> = domain.into_iter().collect();
        (0..count)
            .map(|_| self.add_variable(Variable::new(domain.iter().cloned())))
            .collect()
    }

    /// Adds one named, unassigned variable per name, all sharing one domain.
    ///
    /// Returns the handles in the order the names were given.
    pub fn add_named_variables<S: Into<String>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
        domain: impl IntoIterator<Item = V>,
    ) -> Result<Vec<VariableId>> {
        let domain: Vec<V> = domain.into_iter().collect();
        names
            .into_iter()
            .map(|name| self.add_named_variable(name, Variable::new(domain.iter().cloned())))
            .collect()
    }

    /// Adds a constraint over `variables` (duplicates dropped, order kept).
    ///
    /// A unary constraint is enforced immediately: its variable's domain is
    /// filtered to the values `evaluator` accepts. Fails if the variable is
    /// assigned to a value the unary constraint rejects.
    pub fn add_constraint<F>(
        &mut self,
        variables: impl IntoIterator<Item = VariableId>,
        evaluator: F,
    ) -> Result<ConstraintId>
    where
        F: Fn(&[V]) -> bool + 'static,
    {
        let mut scope: Vec<VariableId> = Vec::new();
        for id in variables {
            self.check_variable(id)?;
            if !scope.contains(&id) {
                scope.push(id);
            }
        }
        if scope.is_empty() {
            return Err(CspError::EmptyConstraint);
        }

        let constraint = Constraint::new(scope, Rc::new(evaluator));
        if constraint.arity() == 1 {
            self.enforce_unary(&constraint)?;
        }
        Ok(self.push_constraint(constraint))
    }

    fn enforce_unary(&mut self, constraint: &Constraint<V>) -> Result<()> {
        let id = constraint.variables()[0];
        let variable = &self.variables[id.0];
        if let Some(current) = variable.value() {
            if !constraint.accepts(|_| Some(current)) {
                return Err(CspError::variable(
                    id,
                    VariableError::UncontainedValue {
                        value: format!("{current:?}"),
                    },
                ));
            }
        }
        let kept: Vec<V> = variable
            .domain()
            .iter()
            .filter(|&value| constraint.accepts(|_| Some(value)))
            .cloned()
            .collect();
        self.variables[id.0].restore_domain(kept);
        Ok(())
    }

    fn push_constraint(&mut self, constraint: Constraint<V>) -> ConstraintId {
        let cid = ConstraintId(self.constraints.len());
        for &a in constraint.variables() {
            self.constraints_of[a.0].push(cid);
            for &b in constraint.variables() {
                if a != b {
                    self.neighbors[a.0].insert(b);
                }
            }
        }
        debug!("added constraint {cid} over {:?}", constraint.variables());
        self.constraints.push(constraint);
        cid
    }

    /// Records a joint-assignment table on a constraint.
    pub(crate) fn record_table(
        &mut self,
        constraint: ConstraintId,
        scope: Vec<VariableId>,
        table: ConsistencyTable<V>,
    ) {
        self.constraints[constraint.0].record(scope, table);
    }

    fn check_variable(&self, id: VariableId) -> Result<()> {
        if id.0 < self.variables.len() {
            Ok(())
        } else {
            Err(CspError::UnknownVariable(id))
        }
    }

    // ---- Variables ----

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// All variable handles, in insertion order.
    pub fn variables(&self) -> impl ExactSizeIterator<Item = VariableId> + Clone {
        (0..self.variables.len()).map(VariableId)
    }

    pub fn variable(&self, id: VariableId) -> &Variable<V> {
        &self.variables[id.0]
    }

    pub fn domain(&self, id: VariableId) -> &[V] {
        self.variables[id.0].domain()
    }

    pub fn value(&self, id: VariableId) -> Option<&V> {
        self.variables[id.0].value()
    }

    pub fn is_assigned(&self, id: VariableId) -> bool {
        self.variables[id.0].is_assigned()
    }

    pub fn assigned_variables(&self) -> Vec<VariableId> {
        self.variables().filter(|&id| self.is_assigned(id)).collect()
    }

    pub fn unassigned_variables(&self) -> Vec<VariableId> {
        self.variables().filter(|&id| !self.is_assigned(id)).collect()
    }

    pub fn variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.names.get(name).copied()
    }

    pub fn names(&self) -> &HashMap<String, VariableId> {
        &self.names
    }

    pub fn neighbors(&self, id: VariableId) -> &BTreeSet<VariableId> {
        &self.neighbors[id.0]
    }

    pub fn assigned_neighbors(&self, id: VariableId) -> Vec<VariableId> {
        self.neighbors[id.0]
            .iter()
            .copied()
            .filter(|&n| self.is_assigned(n))
            .collect()
    }

    pub fn unassigned_neighbors(&self, id: VariableId) -> Vec<VariableId> {
        self.neighbors[id.0]
            .iter()
            .copied()
            .filter(|&n| !self.is_assigned(n))
            .collect()
    }

    /// The neighbor graph as an adjacency list indexed by variable.
    pub fn constraint_graph(&self) -> &[BTreeSet<VariableId>] {
        &self.neighbors
    }

    // ---- Constraints ----

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> impl ExactSizeIterator<Item = ConstraintId> + Clone {
        (0..self.constraints.len()).map(ConstraintId)
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint<V> {
        &self.constraints[id.0]
    }

    pub fn constraints_containing(&self, id: VariableId) -> &[ConstraintId] {
        &self.constraints_of[id.0]
    }

    /// Constraints whose scope contains both variables.
    pub fn shared_constraints(&self, a: VariableId, b: VariableId) -> Vec<ConstraintId> {
        self.constraints_of[a.0]
            .iter()
            .copied()
            .filter(|&c| self.constraints[c.0].contains(b))
            .collect()
    }

    fn live<'s>(&'s self) -> impl Fn(VariableId) -> Option<&'s V> + 's {
        move |id| self.variables[id.0].value()
    }

    fn with_trial<'a>(
        &'a self,
        trial: &'a [(VariableId, &'a V)],
    ) -> impl Fn(VariableId) -> Option<&'a V> + 'a {
        move |id| match trial.iter().rev().find(|(t, _)| *t == id) {
            Some(&(_, value)) => Some(value),
            None => self.variables[id.0].value(),
        }
    }

    /// Whether the constraint accepts the values of its assigned members.
    pub fn is_constraint_consistent(&self, id: ConstraintId) -> bool {
        self.constraints[id.0].accepts(self.live())
    }

    /// Whether all members are assigned and the constraint holds.
    pub fn is_constraint_satisfied(&self, id: ConstraintId) -> bool {
        self.constraints[id.0].satisfied_by(self.live())
    }

    pub fn consistent_constraints(&self) -> Vec<ConstraintId> {
        self.constraints()
            .filter(|&c| self.is_constraint_consistent(c))
            .collect()
    }

    pub fn inconsistent_constraints(&self) -> Vec<ConstraintId> {
        self.constraints()
            .filter(|&c| !self.is_constraint_consistent(c))
            .collect()
    }

    pub fn satisfied_constraints(&self) -> Vec<ConstraintId> {
        self.constraints()
            .filter(|&c| self.is_constraint_satisfied(c))
            .collect()
    }

    pub fn unsatisfied_constraints(&self) -> Vec<ConstraintId> {
        self.constraints()
            .filter(|&c| !self.is_constraint_satisfied(c))
            .collect()
    }

    /// Number of unsatisfied constraints.
    pub fn conflict_count(&self) -> usize {
        self.constraints()
            .filter(|&c| !self.is_constraint_satisfied(c))
            .count()
    }

    // ---- Consistent domains ----

    /// Values of `id`'s domain accepted by every constraint containing it,
    /// given the other currently assigned variables.
    ///
    /// The variable's own current value is ignored. A variable without
    /// constraints keeps its full domain.
    pub fn consistent_domain(&self, id: VariableId) -> Vec<V> {
        self.consistent_domain_with(id, &[])
    }

    /// Like [`consistent_domain`](Self::consistent_domain), with `trial`
    /// values overriding the live state.
    pub fn consistent_domain_with(&self, id: VariableId, trial: &[(VariableId, &V)]) -> Vec<V> {
        self.domain(id)
            .iter()
            .filter(|&value| self.accepts_value_with(id, value, trial))
            .cloned()
            .collect()
    }

    /// Whether every constraint containing `id` accepts `id = value` on top
    /// of `trial` and the live state.
    pub fn accepts_value_with(&self, id: VariableId, value: &V, trial: &[(VariableId, &V)]) -> bool {
        let mut overrides = Vec::with_capacity(trial.len() + 1);
        overrides.extend_from_slice(trial);
        overrides.push((id, value));
        let lookup = self.with_trial(&overrides);
        self.constraints_of[id.0]
            .iter()
            .all(|&c| self.constraints[c.0].accepts(&lookup))
    }

    /// Consistent values of `variable` with respect to a single constraint.
    pub fn constraint_consistent_domain(
        &self,
        constraint: ConstraintId,
        variable: VariableId,
    ) -> Result<Vec<V>> {
        let c = &self.constraints[constraint.0];
        if !c.contains(variable) {
            return Err(CspError::UncontainedVariable {
                constraint,
                variable,
            });
        }
        Ok(self
            .domain(variable)
            .iter()
            .filter(|&value| c.accepts(self.with_trial(&[(variable, value)])))
            .cloned()
            .collect())
    }

    /// Whether the constraint is consistent with `trial` overriding the live
    /// state.
    pub fn is_constraint_consistent_with(
        &self,
        id: ConstraintId,
        trial: &[(VariableId, &V)],
    ) -> bool {
        self.constraints[id.0].accepts(self.with_trial(trial))
    }

    /// Number of constraints containing `id` left unsatisfied if `id` took
    /// `value`.
    pub fn conflicts_with(&self, id: VariableId, value: &V) -> usize {
        self.conflicting_constraints_with(id, value).len()
    }

    /// The constraints containing `id` left unsatisfied if `id` took `value`.
    pub fn conflicting_constraints_with(&self, id: VariableId, value: &V) -> Vec<ConstraintId> {
        let overrides = [(id, value)];
        let lookup = self.with_trial(&overrides);
        self.constraints_of[id.0]
            .iter()
            .copied()
            .filter(|&c| !self.constraints[c.0].satisfied_by(&lookup))
            .collect()
    }

    // ---- Whole-problem predicates ----

    pub fn current_assignment(&self) -> Assignment<V> {
        self.variables.iter().map(|v| v.value().cloned()).collect()
    }

    pub fn is_completely_unassigned(&self) -> bool {
        self.variables.iter().all(|v| !v.is_assigned())
    }

    pub fn is_completely_assigned(&self) -> bool {
        self.variables.iter().all(Variable::is_assigned)
    }

    /// Whether every constraint is consistent with the current partial
    /// assignment.
    pub fn is_consistently_assigned(&self) -> bool {
        self.constraints().all(|c| self.is_constraint_consistent(c))
    }

    /// Whether the current assignment is a solution.
    pub fn is_completely_consistently_assigned(&self) -> bool {
        self.is_completely_assigned()
            && self.constraints().all(|c| self.is_constraint_satisfied(c))
    }

    // ---- Evaluation against detached assignments ----

    pub fn is_constraint_satisfied_in(&self, id: ConstraintId, assignment: &Assignment<V>) -> bool {
        self.constraints[id.0].satisfied_by(|v| assignment.get(v))
    }

    pub fn satisfied_count_in(&self, assignment: &Assignment<V>) -> usize {
        self.constraints()
            .filter(|&c| self.is_constraint_satisfied_in(c, assignment))
            .count()
    }

    pub fn consistent_count_in(&self, assignment: &Assignment<V>) -> usize {
        self.constraints
            .iter()
            .filter(|c| c.accepts(|v| assignment.get(v)))
            .count()
    }

    pub fn conflict_count_in(&self, assignment: &Assignment<V>) -> usize {
        self.constraint_count() - self.satisfied_count_in(assignment)
    }

    pub fn is_solution(&self, assignment: &Assignment<V>) -> bool {
        assignment.len() == self.variable_count()
            && assignment.is_complete()
            && self
                .constraints()
                .all(|c| self.is_constraint_satisfied_in(c, assignment))
    }

    // ---- Mutations ----

    /// Assigns `value` to `id`. The variable must be unassigned.
    pub fn assign(&mut self, id: VariableId, value: V) -> Result<()> {
        self.check_variable(id)?;
        self.variables[id.0]
            .assign(value)
            .map_err(|e| CspError::variable(id, e))
    }

    pub fn unassign(&mut self, id: VariableId) {
        self.variables[id.0].unassign();
    }

    pub fn unassign_all(&mut self) {
        self.variables.iter_mut().for_each(Variable::unassign);
    }

    /// Unassigns every variable outside `read_only`.
    pub fn unassign_all_except(&mut self, read_only: &HashSet<VariableId>) {
        for (i, variable) in self.variables.iter_mut().enumerate() {
            if !read_only.contains(&VariableId(i)) {
                variable.unassign();
            }
        }
    }

    /// Replaces every variable's value with the snapshot's.
    ///
    /// The snapshot is validated first; on error nothing is changed.
    pub fn assign_from(&mut self, assignment: &Assignment<V>) -> Result<()> {
        if assignment.len() != self.variables.len() {
            return Err(CspError::AssignmentLength {
                expected: self.variables.len(),
                found: assignment.len(),
            });
        }
        for (id, value) in assignment.iter() {
            if let Some(value) = value {
                if !self.variables[id.0].contains(value) {
                    return Err(CspError::variable(
                        id,
                        VariableError::UncontainedValue {
                            value: format!("{value:?}"),
                        },
                    ));
                }
            }
        }
        for (id, value) in assignment.iter() {
            let variable = &mut self.variables[id.0];
            variable.unassign();
            if let Some(value) = value {
                variable
                    .assign(value.clone())
                    .map_err(|e| CspError::variable(id, e))?;
            }
        }
        Ok(())
    }

    /// Assigns a uniformly random domain value to every unassigned variable
    /// outside `read_only`. Returns the assignments made.
    ///
    /// Variables with an empty domain are left unassigned.
    pub fn assign_randomly<R: Rng + ?Sized>(
        &mut self,
        read_only: &HashSet<VariableId>,
        rng: &mut R,
    ) -> Vec<(VariableId, V)> {
        let mut made = Vec::new();
        for i in 0..self.variables.len() {
            let id = VariableId(i);
            let variable = &mut self.variables[i];
            if variable.is_assigned() || read_only.contains(&id) {
                continue;
            }
            match variable.domain().choose(rng).cloned() {
                Some(value) => {
                    if variable.assign(value.clone()).is_ok() {
                        made.push((id, value));
                    }
                }
                None => warn!("variable {id} has an empty domain and stays unassigned"),
            }
        }
        made
    }

    /// Removes `value` from `id`'s domain. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// [`CspError::UnknownVariable`] for a foreign id, or
    /// [`VariableError::RemovesCurrentValue`] if `id` is assigned to `value`.
    /// The domain is untouched in both cases.
    pub fn remove_from_domain(&mut self, id: VariableId, value: &V) -> Result<bool> {
        self.check_variable(id)?;
        let variable = &mut self.variables[id.0];
        if variable.value() == Some(value) {
            return Err(CspError::variable(
                id,
                VariableError::RemovesCurrentValue {
                    value: format!("{value:?}"),
                },
            ));
        }
        Ok(variable.remove_from_domain(value))
    }

    /// Removes `value` from the domain of the unassigned `id`.
    pub(crate) fn prune(&mut self, id: VariableId, value: &V) -> bool {
        debug_assert!(!self.is_assigned(id));
        self.variables[id.0].remove_from_domain(value)
    }

    /// Replaces `id`'s domain. Rejected if the current value would be lost.
    pub fn set_domain(&mut self, id: VariableId, domain: impl IntoIterator<Item = V>) -> Result<()> {
        self.check_variable(id)?;
        self.variables[id.0]
            .set_domain(domain)
            .map_err(|e| CspError::variable(id, e))
    }

    pub(crate) fn retain_domain(&mut self, id: VariableId, keep: impl FnMut(&V) -> bool) {
        self.variables[id.0].retain_domain(keep);
    }

    /// Copies the domains of `ids` so they can be put back later.
    pub(crate) fn snapshot_domains(
        &self,
        ids: impl IntoIterator<Item = VariableId>,
    ) -> Vec<(VariableId, Vec<V>)> {
        ids.into_iter()
            .map(|id| (id, self.domain(id).to_vec()))
            .collect()
    }

    pub(crate) fn restore_domains(&mut self, snapshot: Vec<(VariableId, Vec<V>)>) {
        for (id, domain) in snapshot {
            self.variables[id.0].restore_domain(domain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::evaluators;
    use crate::test_fixtures::{divisor_chain, map_coloring};

    #[test]
    fn test_neighbors_and_membership_follow_constraints() {
        let mut p = ConstraintProblem::new();
        let ids = p.add_variables(4, [1, 2, 3]);
        p.add_constraint([ids[0], ids[1]], evaluators::all_different())
            .unwrap();
        assert!(p.neighbors(ids[0]).contains(&ids[1]));
        assert!(p.neighbors(ids[2]).is_empty());

        let c = p
            .add_constraint([ids[1], ids[2], ids[1]], evaluators::all_different())
            .unwrap();
        assert_eq!(p.constraint(c).variables(), &[ids[1], ids[2]]);
        assert_eq!(p.constraints_containing(ids[1]).len(), 2);
        assert_eq!(
            p.neighbors(ids[1]).iter().copied().collect::<Vec<_>>(),
            vec![ids[0], ids[2]]
        );
        assert!(!p.neighbors(ids[1]).contains(&ids[1]), "no self loops");
    }

    #[test]
    fn test_unary_constraint_filters_domain() {
        let mut p = ConstraintProblem::new();
        let x = p.add_variable(Variable::new(1..=6));
        p.add_constraint([x], |vals: &[i32]| vals.iter().all(|v| v % 2 == 0))
            .unwrap();
        assert_eq!(p.domain(x), &[2, 4, 6]);
    }

    #[test]
    fn test_unary_constraint_rejecting_current_value() {
        let mut p = ConstraintProblem::new();
        let x = p.add_variable(Variable::with_value(1..=3, 1).unwrap());
        let err = p
            .add_constraint([x], |vals: &[i32]| vals.iter().all(|&v| v > 1))
            .unwrap_err();
        assert!(matches!(err, CspError::Variable { .. }));
        assert_eq!(p.domain(x), &[1, 2, 3]);
        assert_eq!(p.constraint_count(), 0);
    }

    #[test]
    fn test_constraint_errors() {
        let mut p: ConstraintProblem<u8> = ConstraintProblem::new();
        assert_eq!(
            p.add_constraint([], evaluators::always_satisfied())
                .unwrap_err(),
            CspError::EmptyConstraint
        );
        assert_eq!(
            p.add_constraint([VariableId(3)], evaluators::always_satisfied())
                .unwrap_err(),
            CspError::UnknownVariable(VariableId(3))
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut p = ConstraintProblem::new();
        p.add_named_variable("a", Variable::new([1])).unwrap();
        let err = p.add_named_variable("a", Variable::new([2])).unwrap_err();
        assert_eq!(err, CspError::DuplicateName("a".into()));
        assert_eq!(p.variable_count(), 1);
    }

    #[test]
    fn test_consistent_domain_ignores_own_value() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        let (wa, nt, sa) = (names["wa"], names["nt"], names["sa"]);
        p.assign(wa, "red").unwrap();
        p.assign(nt, "green").unwrap();
        assert_eq!(p.consistent_domain(sa), vec!["blue"]);
        assert_eq!(p.consistent_domain(wa).len(), 2);
        assert_eq!(p.consistent_domain(names["t"]).len(), 3);
    }

    #[test]
    fn test_constraint_consistent_domain_requires_membership() {
        let (p, [x, y, z]) = divisor_chain();
        let c = p.constraints_containing(x)[0];
        assert_eq!(
            p.constraint_consistent_domain(c, y).unwrap_err(),
            CspError::UncontainedVariable {
                constraint: c,
                variable: y
            }
        );
        assert_eq!(p.constraint_consistent_domain(c, z).unwrap(), vec![2, 5]);
    }

    #[test]
    fn test_constraint_status_queries() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        assert!(p.is_completely_unassigned());
        assert!(p.is_consistently_assigned());
        assert_eq!(p.satisfied_constraints().len(), 0);

        p.assign(names["wa"], "red").unwrap();
        p.assign(names["nt"], "red").unwrap();
        assert!(!p.is_consistently_assigned());
        assert_eq!(p.inconsistent_constraints().len(), 1);
        assert_eq!(p.consistent_constraints().len(), p.constraint_count() - 1);
        assert_eq!(p.conflict_count(), p.constraint_count());
        assert_eq!(p.assigned_neighbors(names["sa"]).len(), 2);
        assert_eq!(p.unassigned_neighbors(names["sa"]).len(), 3);
    }

    #[test]
    fn test_assign_from_snapshot_is_atomic() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        p.assign(names["q"], "blue").unwrap();
        let before = p.current_assignment();

        let mut bad = Assignment::unassigned(p.variable_count());
        bad.set(names["wa"], Some("red"));
        bad.set(names["nt"], Some("purple"));
        assert!(p.assign_from(&bad).is_err());
        assert_eq!(p.current_assignment(), before);

        assert!(matches!(
            p.assign_from(&Assignment::unassigned(2)),
            Err(CspError::AssignmentLength { .. })
        ));

        let mut good = Assignment::unassigned(p.variable_count());
        good.set(names["wa"], Some("red"));
        p.assign_from(&good).unwrap();
        assert_eq!(p.value(names["wa"]), Some(&"red"));
        assert_eq!(p.value(names["q"]), None);
    }

    #[test]
    fn test_assign_randomly_respects_read_only() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        p.assign(names["t"], "green").unwrap();
        let read_only = HashSet::from([names["wa"]]);
        let mut rng = crate::random::create_rng(Some(3));
        let made = p.assign_randomly(&read_only, &mut rng);
        assert_eq!(made.len(), 5);
        assert!(!p.is_assigned(names["wa"]));
        assert_eq!(p.value(names["t"]), Some(&"green"));

        p.unassign_all_except(&HashSet::from([names["t"]]));
        assert_eq!(p.assigned_variables(), vec![names["t"]]);
        p.unassign_all();
        assert!(p.is_completely_unassigned());
    }

    #[test]
    fn test_detached_evaluation_matches_live() {
        let (mut p, _) = map_coloring(&["red", "green", "blue"]);
        let mut rng = crate::random::create_rng(Some(11));
        p.assign_randomly(&HashSet::new(), &mut rng);
        let snapshot = p.current_assignment();
        assert_eq!(p.conflict_count_in(&snapshot), p.conflict_count());
        assert_eq!(
            p.consistent_count_in(&snapshot),
            p.consistent_constraints().len()
        );
        assert_eq!(p.is_solution(&snapshot), p.is_completely_consistently_assigned());
    }

    #[test]
    fn test_conflicts_with_counts_only_touching_constraints() {
        let (mut p, names) = map_coloring(&["red", "green", "blue"]);
        let colors = [
            ("wa", "red"),
            ("nt", "green"),
            ("q", "red"),
            ("nsw", "green"),
            ("v", "red"),
            ("t", "red"),
        ];
        for (name, color) in colors {
            p.assign(names[name], color).unwrap();
        }
        p.assign(names["sa"], "red").unwrap();
        assert_eq!(p.conflicts_with(names["sa"], &"blue"), 0);
        assert_eq!(p.conflicts_with(names["sa"], &"red"), 3);
    }

    #[test]
    fn test_domain_snapshot_roundtrip() {
        let (mut p, [x, y, _]) = divisor_chain();
        let snapshot = p.snapshot_domains([x, y]);
        assert!(p.remove_from_domain(x, &5).unwrap());
        p.retain_domain(y, |_| false);
        p.restore_domains(snapshot);
        assert_eq!(p.domain(x), &[2, 5]);
        assert_eq!(p.domain(y), &[2, 4]);
    }

    #[test]
    fn test_remove_from_domain_keeps_current_value() {
        let mut p = ConstraintProblem::new();
        let x = p.add_variable(Variable::new([1, 2, 3]));
        p.assign(x, 2).unwrap();
        assert!(matches!(
            p.remove_from_domain(x, &2),
            Err(CspError::Variable {
                source: VariableError::RemovesCurrentValue { .. },
                ..
            })
        ));
        assert_eq!(p.value(x), Some(&2));
        assert_eq!(p.domain(x), &[1, 2, 3]);

        assert!(p.remove_from_domain(x, &3).unwrap());
        assert!(!p.remove_from_domain(x, &3).unwrap());
        assert_eq!(p.domain(x), &[1, 2]);
        assert!(p.domain(x).contains(p.value(x).unwrap()));
    }

    #[test]
    fn test_remove_from_domain_unknown_variable() {
        let (mut p, _) = divisor_chain();
        let mut other = ConstraintProblem::new();
        let stranger = (0..=p.variable_count())
            .map(|_| other.add_variable(Variable::new([0])))
            .last()
            .unwrap();
        assert_eq!(
            p.remove_from_domain(stranger, &2),
            Err(CspError::UnknownVariable(stranger))
        );
    }

    #[test]
    fn test_set_domain_rejects_losing_value() {
        let (mut p, [x, _, _]) = divisor_chain();
        p.assign(x, 5).unwrap();
        assert!(p.set_domain(x, [2]).is_err());
        p.set_domain(x, [5, 7]).unwrap();
        assert_eq!(p.domain(x), &[5, 7]);
    }
}
