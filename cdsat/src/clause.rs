//! The clause store.
//!
//! Original and learnt clauses share a single growable vector. Learnt clauses can be forgotten,
//! which only marks them as deleted (a tombstone) rather than shrinking the vector, so that
//! existing indices (used as [`Reason::Clause`] payloads and forget-selection keys) stay valid for
//! the remainder of the search.

use cdsat_formula::Lit;

/// Why a literal on the trail was assigned.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Reason {
    /// Chosen by the decision heuristic.
    Decision,
    /// Forced by a clause that was already unit (or empty) when loaded, independent of the
    /// current search state.
    GlobalUnit,
    /// Forced to become the only unassigned literal of the clause at this index.
    Clause(usize),
}

/// A single clause, either part of the original formula or learnt during search.
pub struct Clause {
    literals: Vec<Lit>,
    learnt: bool,
    deleted: bool,
}

impl Clause {
    fn new(literals: Vec<Lit>, learnt: bool) -> Clause {
        debug_assert!(literals.len() >= 2);
        Clause {
            literals,
            learnt,
            deleted: false,
        }
    }

    pub fn literals(&self) -> &[Lit] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_learnt(&self) -> bool {
        self.learnt
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// The two currently watched literals, always kept at positions 0 and 1.
    pub fn watches(&self) -> (Lit, Lit) {
        (self.literals[0], self.literals[1])
    }
}

/// The outcome of re-establishing a clause's watch after one of its watched literals became
/// false.
pub enum WatchOutcome {
    /// The clause is already satisfied by its other watch or a newly found watch.
    Satisfied,
    /// A new, not-yet-false literal was found to replace the watch; it now lives in `new_watch`
    /// and should be added to that literal's watchlist.
    Moved { new_watch: Lit },
    /// No replacement was found and the other watch is unassigned: the clause is unit, forcing
    /// `unit_lit`.
    Unit { unit_lit: Lit },
    /// No replacement was found and the other watch is false too: the clause is falsified.
    Conflict,
}

/// Re-establish the watch invariant for `clause` after `false_lit` (one of its two watches)
/// became false.
///
/// Mirrors the classic two-watched-literal update: the falsified literal is moved to position 0,
/// the other watch (the "blocking" literal) is checked first, and only if that is not already
/// true do we scan the rest of the clause for a non-false literal to take over the watch.
pub fn update_watch(
    clause: &mut Clause,
    lit_value: impl Fn(Lit) -> Option<bool>,
    false_lit: Lit,
) -> WatchOutcome {
    if clause.literals[0] == false_lit {
        clause.literals.swap(0, 1);
    }
    debug_assert_eq!(clause.literals[1], false_lit);

    let other_watch = clause.literals[0];
    if lit_value(other_watch) == Some(true) {
        return WatchOutcome::Satisfied;
    }

    for i in 2..clause.literals.len() {
        let candidate = clause.literals[i];
        if lit_value(candidate) != Some(false) {
            clause.literals.swap(1, i);
            return WatchOutcome::Moved {
                new_watch: clause.literals[1],
            };
        }
    }

    if lit_value(other_watch) == Some(false) {
        WatchOutcome::Conflict
    } else {
        WatchOutcome::Unit {
            unit_lit: other_watch,
        }
    }
}

/// Storage for all original and learnt clauses.
#[derive(Default)]
pub struct ClauseDb {
    clauses: Vec<Clause>,
}

impl ClauseDb {
    /// Add an original clause (at least two literals, already deduplicated and non-tautological).
    ///
    /// Picks the first two literals as watches; this is safe before search starts since no
    /// literal is yet assigned.
    pub fn add_original(&mut self, literals: Vec<Lit>) -> usize {
        let idx = self.clauses.len();
        self.clauses.push(Clause::new(literals, false));
        idx
    }

    /// Add a learnt clause produced by conflict analysis.
    ///
    /// `asserting_lit` (the First-UIP literal, which becomes unassigned after backjumping) is
    /// placed at watch position 0. The literal among the rest of the clause with the highest
    /// assigned level (which stays assigned after backjumping to the second-highest level) is
    /// placed at watch position 1.
    pub fn add_learnt(&mut self, mut literals: Vec<Lit>, asserting_lit: Lit, level: impl Fn(Lit) -> usize) -> usize {
        let uip_pos = literals.iter().position(|&l| l == asserting_lit).unwrap();
        literals.swap(0, uip_pos);

        if literals.len() > 1 {
            let mut best = 1;
            for i in 2..literals.len() {
                if level(literals[i]) > level(literals[best]) {
                    best = i;
                }
            }
            literals.swap(1, best);
        }

        let idx = self.clauses.len();
        self.clauses.push(Clause::new(literals, true));
        idx
    }

    pub fn get(&self, idx: usize) -> &Clause {
        &self.clauses[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut Clause {
        &mut self.clauses[idx]
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Mark a learnt clause as forgotten. Its index is never reused.
    pub fn forget(&mut self, idx: usize) {
        debug_assert!(self.clauses[idx].is_learnt());
        self.clauses[idx].deleted = true;
    }

    /// Iterate over indices and clauses of all live (non-deleted) learnt clauses.
    pub fn iter_live_learnt(&self) -> impl Iterator<Item = (usize, &Clause)> {
        self.clauses
            .iter()
            .enumerate()
            .filter(|(_, clause)| clause.learnt && !clause.deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdsat_formula::lits;

    fn values(assigned: &[(Lit, bool)]) -> impl Fn(Lit) -> Option<bool> + '_ {
        move |lit: Lit| {
            assigned.iter().find_map(|&(l, v)| {
                if l.var() == lit.var() {
                    Some(v != lit.is_negative())
                } else {
                    None
                }
            })
        }
    }

    #[test]
    fn update_watch_moves_to_unassigned_literal() {
        let mut clause = Clause::new(lits![1, 2, 3].to_vec(), false);
        let lit1 = lits![1][0];
        let value = values(&[(lit1, false)]);

        match update_watch(&mut clause, value, !lit1) {
            WatchOutcome::Moved { new_watch } => assert_eq!(new_watch, lits![3][0]),
            _ => panic!("expected a moved watch"),
        }
    }

    #[test]
    fn update_watch_detects_unit() {
        let mut clause = Clause::new(lits![1, 2, 3].to_vec(), false);
        let assigned = [(lits![2][0], false), (lits![3][0], false)];
        let value = values(&assigned);

        match update_watch(&mut clause, value, lits![-2][0]) {
            WatchOutcome::Unit { unit_lit } => assert_eq!(unit_lit, lits![1][0]),
            _ => panic!("expected a unit clause"),
        }
    }

    #[test]
    fn update_watch_detects_conflict() {
        let mut clause = Clause::new(lits![1, 2, 3].to_vec(), false);
        let assigned = [
            (lits![1][0], false),
            (lits![2][0], false),
            (lits![3][0], false),
        ];
        let value = values(&assigned);

        assert!(matches!(
            update_watch(&mut clause, value, lits![-2][0]),
            WatchOutcome::Conflict
        ));
    }

    #[test]
    fn update_watch_satisfied_by_blocking_literal() {
        let mut clause = Clause::new(lits![1, 2, 3].to_vec(), false);
        let assigned = [(lits![1][0], true), (lits![2][0], false)];
        let value = values(&assigned);

        assert!(matches!(
            update_watch(&mut clause, value, lits![-2][0]),
            WatchOutcome::Satisfied
        ));
    }

    #[test]
    fn forgotten_clauses_are_excluded_from_live_iteration() {
        let mut db = ClauseDb::default();
        let a = db.add_original(lits![1, 2].to_vec());
        let b = db.add_learnt(lits![1, 3].to_vec(), lits![1][0], |_| 0);
        assert_eq!(db.iter_live_learnt().count(), 1);

        db.forget(b);
        assert_eq!(db.iter_live_learnt().count(), 0);
        assert_eq!(db.get(a).len(), 2);
    }
}
