//! The assignment store.
//!
//! Tracks the current partial Boolean assignment together with the decision level and reason each
//! variable was assigned with.

use cdsat_formula::{Lit, Var};

use crate::clause::Reason;

/// The reason and level recorded for an assigned variable.
#[derive(Copy, Clone, Debug)]
pub struct VarState {
    pub value: bool,
    pub level: usize,
    pub reason: Reason,
}

/// Stores the current partial assignment.
///
/// Indexed by variable. A variable with no entry is unassigned.
#[derive(Default)]
pub struct Assignment {
    state: Vec<Option<VarState>>,
}

impl Assignment {
    /// Grow the assignment store to support at least `var_count` variables.
    pub fn ensure_var_count(&mut self, var_count: usize) {
        if self.state.len() < var_count {
            self.state.resize(var_count, None);
        }
    }

    /// Number of variables the assignment store currently supports.
    pub fn var_count(&self) -> usize {
        self.state.len()
    }

    /// The current value of a variable, if assigned.
    pub fn var_value(&self, var: Var) -> Option<bool> {
        self.state[var.index()].map(|state| state.value)
    }

    /// The current value of a literal, if assigned, accounting for its polarity.
    pub fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.var_value(lit.var())
            .map(|value| value != lit.is_negative())
    }

    pub fn lit_is_true(&self, lit: Lit) -> bool {
        self.lit_value(lit) == Some(true)
    }

    pub fn lit_is_false(&self, lit: Lit) -> bool {
        self.lit_value(lit) == Some(false)
    }

    pub fn lit_is_unassigned(&self, lit: Lit) -> bool {
        self.lit_value(lit).is_none()
    }

    pub fn is_assigned(&self, var: Var) -> bool {
        self.state[var.index()].is_some()
    }

    /// The decision level a variable was assigned at.
    pub fn level(&self, var: Var) -> Option<usize> {
        self.state[var.index()].map(|state| state.level)
    }

    /// The reason a variable was assigned, for backward analysis of the implication graph.
    pub fn reason(&self, var: Var) -> Option<Reason> {
        self.state[var.index()].map(|state| state.reason)
    }

    /// Assign `lit` to true at the given level, for the given reason.
    ///
    /// Panics (in debug builds) if the underlying variable is already assigned.
    pub fn assign(&mut self, lit: Lit, level: usize, reason: Reason) {
        debug_assert!(self.state[lit.var().index()].is_none());
        let value = lit.is_positive();
        self.state[lit.var().index()] = Some(VarState {
            value,
            level,
            reason,
        });
    }

    /// Undo the assignment of `var`, returning it to unassigned.
    pub fn unassign(&mut self, var: Var) {
        debug_assert!(self.state[var.index()].is_some());
        self.state[var.index()] = None;
    }

    /// Whether every variable currently has a value.
    pub fn is_total(&self) -> bool {
        self.state.iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdsat_formula::var;

    #[test]
    fn assign_and_read_back() {
        let mut assignment = Assignment::default();
        assignment.ensure_var_count(4);

        let v = var![2];
        assignment.assign(v.lit(false), 1, Reason::Decision);

        assert_eq!(assignment.var_value(v), Some(true));
        assert!(assignment.lit_is_true(v.lit(false)));
        assert!(assignment.lit_is_false(v.lit(true)));
        assert_eq!(assignment.level(v), Some(1));
    }

    #[test]
    fn unassign_clears_value() {
        let mut assignment = Assignment::default();
        assignment.ensure_var_count(4);

        let v = var![1];
        assignment.assign(v.lit(true), 2, Reason::Decision);
        assignment.unassign(v);
        assert_eq!(assignment.var_value(v), None);
    }

    #[test]
    fn is_total_tracks_all_variables() {
        let mut assignment = Assignment::default();
        assignment.ensure_var_count(2);
        assert!(!assignment.is_total());

        assignment.assign(var![1].lit(false), 0, Reason::Decision);
        assert!(!assignment.is_total());

        assignment.assign(var![2].lit(false), 0, Reason::Decision);
        assert!(assignment.is_total());
    }
}
