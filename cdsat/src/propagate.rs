//! Unit propagation via two-watched-literals.

use crate::assignment::Assignment;
use crate::clause::{update_watch, ClauseDb, Reason, WatchOutcome};
use crate::trail::Trail;
use crate::watch::Watchlist;

/// Propagate every implication reachable from the literals already on the trail's queue.
///
/// Returns `Ok(())` once the queue is drained with no conflict, or `Err(reason)` identifying the
/// clause that became falsified.
///
/// For each newly false literal, its watchlist is taken out of the [`Watchlist`] up front and
/// rebuilt as watchers are processed. This matters when a conflict is found partway through: a
/// plain loop that returns early would silently drop the watchers not yet visited. Instead, the
/// watchers already classified this round plus every remaining, not-yet-visited watcher are
/// written back before returning, so the watchlist stays complete for the next propagation call
/// after backjumping.
pub fn propagate(
    trail: &mut Trail,
    assignment: &mut Assignment,
    clause_db: &mut ClauseDb,
    watchlist: &mut Watchlist,
) -> Result<(), Reason> {
    while let Some(lit) = trail.pop_queue() {
        let false_lit = !lit;
        let watchers = watchlist.take(false_lit);
        let mut kept = Vec::with_capacity(watchers.len());
        let mut conflict = None;

        for (i, &clause_idx) in watchers.iter().enumerate() {
            let clause = clause_db.get_mut(clause_idx);
            match update_watch(clause, |l| assignment.lit_value(l), false_lit) {
                WatchOutcome::Satisfied => kept.push(clause_idx),
                WatchOutcome::Moved { new_watch } => {
                    watchlist.add(new_watch, clause_idx);
                }
                WatchOutcome::Unit { unit_lit } => {
                    kept.push(clause_idx);
                    let level = trail.current_level();
                    assignment.assign(unit_lit, level, Reason::Clause(clause_idx));
                    trail.push(unit_lit);
                }
                WatchOutcome::Conflict => {
                    kept.push(clause_idx);
                    kept.extend_from_slice(&watchers[i + 1..]);
                    conflict = Some(Reason::Clause(clause_idx));
                    break;
                }
            }
        }

        watchlist.set(false_lit, kept);

        if let Some(reason) = conflict {
            return Err(reason);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdsat_formula::{lits, var};

    fn setup(var_count: usize) -> (Trail, Assignment, ClauseDb, Watchlist) {
        let mut assignment = Assignment::default();
        assignment.ensure_var_count(var_count);
        let mut watchlist = Watchlist::default();
        watchlist.ensure_var_count(var_count);
        (Trail::new(), assignment, ClauseDb::default(), watchlist)
    }

    #[test]
    fn unit_propagation_chains() {
        let (mut trail, mut assignment, mut clause_db, mut watchlist) = setup(3);

        // (-1 v 2) and (-2 v 3), with 1 assigned true, should force 2 then 3.
        let c1 = clause_db.add_original(lits![-1, 2].to_vec());
        let (w1a, w1b) = clause_db.get(c1).watches();
        watchlist.add(w1a, c1);
        watchlist.add(w1b, c1);

        let c2 = clause_db.add_original(lits![-2, 3].to_vec());
        let (w2a, w2b) = clause_db.get(c2).watches();
        watchlist.add(w2a, c2);
        watchlist.add(w2b, c2);

        assignment.assign(var![1].lit(false), 0, Reason::GlobalUnit);
        trail.push(var![1].lit(false));

        let result = propagate(&mut trail, &mut assignment, &mut clause_db, &mut watchlist);
        assert!(result.is_ok());
        assert_eq!(assignment.var_value(var![2]), Some(true));
        assert_eq!(assignment.var_value(var![3]), Some(true));
    }

    #[test]
    fn detects_conflict_and_preserves_other_watchers() {
        let (mut trail, mut assignment, mut clause_db, mut watchlist) = setup(3);

        // Two clauses share literal `1` as a watch: once variable 1 is forced false, both become
        // unit/conflicting at the same time; the second must stay correctly registered even
        // though propagation returns early after the first conflict.
        let c1 = clause_db.add_original(lits![1, 2].to_vec());
        let c2 = clause_db.add_original(lits![1, 3].to_vec());
        for &c in &[c1, c2] {
            let (a, b) = clause_db.get(c).watches();
            watchlist.add(a, c);
            watchlist.add(b, c);
        }

        assignment.assign(var![2].lit(true), 0, Reason::GlobalUnit);
        assignment.assign(var![3].lit(true), 0, Reason::GlobalUnit);

        assignment.assign(var![1].lit(true), 0, Reason::GlobalUnit);
        trail.push(var![1].lit(true));

        let result = propagate(&mut trail, &mut assignment, &mut clause_db, &mut watchlist);
        assert!(result.is_err());

        // Both clauses should still be registered on literal `1`'s watchlist, since neither found
        // a replacement watch.
        assert_eq!(watchlist.get(lits![1][0]).len(), 2);
    }
}
