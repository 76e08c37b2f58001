//! Loading clauses into the assignment, trail, clause store and watchlist.
//!
//! Shared between the CDCL search engine and the DPLL variant, since both need the same
//! deduplication, tautology detection, global-unit handling and initial watch selection before
//! any search begins.
use cdsat_formula::Lit;

use crate::assignment::Assignment;
use crate::clause::{ClauseDb, Reason};
use crate::trail::Trail;
use crate::watch::Watchlist;

/// Add one clause of the input formula, returning `false` if doing so revealed the formula is
/// unsatisfiable (an empty clause, a pair of contradictory unit clauses, or a clause every one of
/// whose literals is already forced false by an earlier global unit).
///
/// Removes duplicate literals and drops tautological clauses (`p ∨ ¬p ∨ …`), matching the only
/// preprocessing the core performs beyond detecting globally unit clauses.
pub fn load_clause(
    literals: &[Lit],
    assignment: &mut Assignment,
    trail: &mut Trail,
    clause_db: &mut ClauseDb,
    watchlist: &mut Watchlist,
) -> bool {
    let mut lits: Vec<Lit> = literals.to_vec();
    lits.sort_unstable();
    lits.dedup();

    for window in lits.windows(2) {
        if window[0] == !window[1] {
            return true;
        }
    }

    match lits.len() {
        0 => false,
        1 => load_unit(lits[0], assignment, trail),
        _ => load_long(lits, assignment, clause_db, watchlist),
    }
}

fn load_unit(lit: Lit, assignment: &mut Assignment, trail: &mut Trail) -> bool {
    match assignment.lit_value(lit) {
        Some(true) => true,
        Some(false) => false,
        None => {
            assignment.assign(lit, 0, Reason::GlobalUnit);
            trail.push(lit);
            true
        }
    }
}

fn load_long(
    lits: Vec<Lit>,
    assignment: &Assignment,
    clause_db: &mut ClauseDb,
    watchlist: &mut Watchlist,
) -> bool {
    // Literals whose negation is not already known globally true come first, so that whichever
    // two end up at positions 0 and 1 (the watches `Clause::new` picks) satisfy the initial watch
    // invariant: a watch is only assigned false if no unwatched literal could replace it.
    let mut watchable = Vec::with_capacity(lits.len());
    let mut falsified = Vec::new();
    for lit in lits {
        if assignment.lit_value(lit) != Some(false) {
            watchable.push(lit);
        } else {
            falsified.push(lit);
        }
    }

    if watchable.is_empty() {
        return false;
    }

    watchable.extend(falsified);
    add_tracked(watchable, clause_db, watchlist);
    true
}

fn add_tracked(literals: Vec<Lit>, clause_db: &mut ClauseDb, watchlist: &mut Watchlist) {
    let idx = clause_db.add_original(literals);
    let (w1, w2) = clause_db.get(idx).watches();
    watchlist.add(w1, idx);
    watchlist.add(w2, idx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdsat_formula::lits;

    fn setup() -> (Assignment, Trail, ClauseDb, Watchlist) {
        let mut assignment = Assignment::default();
        assignment.ensure_var_count(5);
        let mut watchlist = Watchlist::default();
        watchlist.ensure_var_count(5);
        (assignment, Trail::new(), ClauseDb::default(), watchlist)
    }

    #[test]
    fn empty_clause_is_unsat() {
        let (mut assignment, mut trail, mut clause_db, mut watchlist) = setup();
        assert!(!load_clause(&[], &mut assignment, &mut trail, &mut clause_db, &mut watchlist));
    }

    #[test]
    fn tautology_is_dropped_without_conflict() {
        let (mut assignment, mut trail, mut clause_db, mut watchlist) = setup();
        assert!(load_clause(
            &lits![1, -1, 2],
            &mut assignment,
            &mut trail,
            &mut clause_db,
            &mut watchlist
        ));
        assert_eq!(clause_db.len(), 0);
    }

    #[test]
    fn duplicate_unit_clauses_are_idempotent() {
        let (mut assignment, mut trail, mut clause_db, mut watchlist) = setup();
        assert!(load_clause(&lits![1], &mut assignment, &mut trail, &mut clause_db, &mut watchlist));
        assert!(load_clause(&lits![1], &mut assignment, &mut trail, &mut clause_db, &mut watchlist));
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn contradictory_unit_clauses_are_unsat() {
        let (mut assignment, mut trail, mut clause_db, mut watchlist) = setup();
        assert!(load_clause(&lits![1], &mut assignment, &mut trail, &mut clause_db, &mut watchlist));
        assert!(!load_clause(&lits![-1], &mut assignment, &mut trail, &mut clause_db, &mut watchlist));
    }

    #[test]
    fn clause_falsified_by_global_units_is_unsat() {
        let (mut assignment, mut trail, mut clause_db, mut watchlist) = setup();
        assert!(load_clause(&lits![1], &mut assignment, &mut trail, &mut clause_db, &mut watchlist));
        assert!(load_clause(&lits![2], &mut assignment, &mut trail, &mut clause_db, &mut watchlist));
        assert!(!load_clause(
            &lits![-1, -2],
            &mut assignment,
            &mut trail,
            &mut clause_db,
            &mut watchlist
        ));
    }

    #[test]
    fn long_clause_with_one_watchable_literal_still_gets_two_distinct_watches() {
        let (mut assignment, mut trail, mut clause_db, mut watchlist) = setup();
        assert!(load_clause(&lits![1], &mut assignment, &mut trail, &mut clause_db, &mut watchlist));
        assert!(load_clause(
            &lits![-1, 2, 3],
            &mut assignment,
            &mut trail,
            &mut clause_db,
            &mut watchlist
        ));
        assert_eq!(clause_db.len(), 1);
        let (w1, w2) = clause_db.get(0).watches();
        assert_ne!(w1, w2);
    }

    #[test]
    fn ordinary_clause_gets_two_unassigned_watches() {
        let (mut assignment, mut trail, mut clause_db, mut watchlist) = setup();
        assert!(load_clause(
            &lits![1, 2, 3],
            &mut assignment,
            &mut trail,
            &mut clause_db,
            &mut watchlist
        ));
        let (w1, w2) = clause_db.get(0).watches();
        assert!(assignment.lit_is_unassigned(w1));
        assert!(assignment.lit_is_unassigned(w2));
    }
}
