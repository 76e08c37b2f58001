//! Activity- and LBD-based learnt clause forgetting.
use rustc_hash::{FxHashMap, FxHashSet};

use cdsat_formula::Lit;

use crate::assignment::Assignment;
use crate::clause::ClauseDb;
use super::luby::luby;

const MAX_ACTIVITY: f64 = 1e100;
const THRESHOLD_FRACTION: f64 = 0.5;

/// Literal Block Distance: the number of distinct decision levels among a clause's literals.
///
/// Clauses that only span a couple of decision levels tend to be more broadly useful than ones
/// spanning many, so a low LBD is used as a signal to keep a learnt clause around.
pub fn lbd(literals: &[Lit], assignment: &Assignment) -> usize {
    let levels: FxHashSet<Option<usize>> = literals
        .iter()
        .map(|lit| assignment.level(lit.var()))
        .collect();
    levels.len()
}

/// Tracks learnt clause activity and decides when and what to forget.
pub struct ClauseForgetter {
    base: u64,
    activity: FxHashMap<usize, f64>,
    bump: f64,
    decay: f64,
    forget_count: u64,
    conflicts_since_forget: u64,
    forget_limit: u64,
}

impl Default for ClauseForgetter {
    fn default() -> ClauseForgetter {
        ClauseForgetter::new(400, 0.95)
    }
}

impl ClauseForgetter {
    pub fn new(base: u64, decay: f64) -> ClauseForgetter {
        let forget_count = 0;
        ClauseForgetter {
            base,
            activity: FxHashMap::default(),
            bump: 1.0,
            decay,
            forget_count,
            conflicts_since_forget: 0,
            forget_limit: base * luby(forget_count + 1),
        }
    }

    /// Bump the activity of a clause (identified by its `ClauseDb` index) during conflict
    /// analysis, renormalizing every tracked activity if the bumped value overflows.
    pub fn bump(&mut self, clause_idx: usize) {
        let entry = self.activity.entry(clause_idx).or_insert(0.0);
        *entry += self.bump;
        if *entry > MAX_ACTIVITY {
            self.normalize();
        }
    }

    fn normalize(&mut self) {
        for value in self.activity.values_mut() {
            *value /= MAX_ACTIVITY;
        }
        self.bump /= MAX_ACTIVITY;
    }

    /// Record that a conflict occurred, decaying the bump so that future activity increases count
    /// for more than past ones.
    pub fn on_conflict(&mut self) {
        self.bump /= self.decay;
        self.conflicts_since_forget += 1;
    }

    pub fn should_forget(&self) -> bool {
        self.conflicts_since_forget > self.forget_limit
    }

    pub fn on_forget(&mut self) {
        self.forget_count += 1;
        self.forget_limit = self.base * luby(self.forget_count + 1);
        self.conflicts_since_forget = 0;
    }

    fn activity_of(&self, clause_idx: usize) -> f64 {
        *self.activity.get(&clause_idx).unwrap_or(&0.0)
    }

    /// Select the learnt clauses to drop: any clause longer than two literals, with an LBD above
    /// two, whose activity does not exceed half the mean activity of all live learnt clauses.
    pub fn choose_clauses_to_forget(&self, clause_db: &ClauseDb, assignment: &Assignment) -> Vec<usize> {
        let activities: Vec<f64> = clause_db
            .iter_live_learnt()
            .map(|(idx, _)| self.activity_of(idx))
            .collect();

        if activities.is_empty() {
            return Vec::new();
        }

        let mean = activities.iter().sum::<f64>() / activities.len() as f64;
        let threshold = THRESHOLD_FRACTION * mean;

        clause_db
            .iter_live_learnt()
            .filter_map(|(idx, clause)| {
                if clause.len() <= 2 {
                    return None;
                }
                if lbd(clause.literals(), assignment) <= 2 {
                    return None;
                }
                if self.activity_of(idx) > threshold {
                    return None;
                }
                Some(idx)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdsat_formula::{lits, var};
    use crate::clause::Reason;

    #[test]
    fn short_and_low_lbd_clauses_are_retained() {
        let mut clause_db = ClauseDb::default();
        let mut assignment = Assignment::default();
        assignment.ensure_var_count(4);
        for i in 1..=4 {
            assignment.assign(var![i].lit(false), 1, Reason::Decision);
        }

        let short = clause_db.add_learnt(lits![1, 2].to_vec(), lits![1][0], |_| 1);
        let low_lbd = clause_db.add_learnt(lits![1, 2, 3].to_vec(), lits![1][0], |_| 1);

        let forgetter = ClauseForgetter::new(400, 0.95);
        let selected = forgetter.choose_clauses_to_forget(&clause_db, &assignment);
        assert!(!selected.contains(&short));
        assert!(!selected.contains(&low_lbd));
    }

    #[test]
    fn low_activity_high_lbd_clause_is_selected() {
        let mut clause_db = ClauseDb::default();
        let mut assignment = Assignment::default();
        assignment.ensure_var_count(4);
        assignment.assign(var![1].lit(false), 1, Reason::Decision);
        assignment.assign(var![2].lit(false), 2, Reason::Decision);
        assignment.assign(var![3].lit(false), 3, Reason::Decision);

        let high_lbd = clause_db.add_learnt(lits![1, 2, 3].to_vec(), lits![1][0], |_| 1);
        let mut forgetter = ClauseForgetter::new(400, 0.95);
        forgetter.bump(high_lbd);
        // A second, much more active clause to pull the mean (and threshold) above this one.
        let active = clause_db.add_learnt(lits![1, 2, 4].to_vec(), lits![1][0], |_| 1);
        for _ in 0..10 {
            forgetter.bump(active);
        }

        let selected = forgetter.choose_clauses_to_forget(&clause_db, &assignment);
        assert!(selected.contains(&high_lbd));
    }
}
