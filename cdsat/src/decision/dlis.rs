//! Dynamic Largest Individual Sum, a decision heuristic with no persistent state.
use cdsat_formula::{Lit, Var};

use super::{DecisionContext, DecisionHeuristic};

/// Picks the literal whose watchlist currently holds the most clauses that are not yet verified
/// satisfied (neither watch is true).
///
/// Unlike VSIDS this heuristic carries no activity state between decisions: every pick rescans
/// the current watchlists, trading speed for simplicity and for being unaffected by restarts.
#[derive(Default)]
pub struct Dlis;

fn possibly_unsatisfied(ctx: &DecisionContext, clause_idx: usize) -> bool {
    let (w1, w2) = ctx.clause_db.get(clause_idx).watches();
    !(ctx.assignment.lit_is_true(w1) || ctx.assignment.lit_is_true(w2))
}

impl DecisionHeuristic for Dlis {
    fn pick(&mut self, ctx: &DecisionContext) -> Lit {
        let mut best: Option<(usize, Lit)> = None;

        for index in 0..ctx.var_count {
            let var = Var::from_index(index);
            if ctx.assignment.is_assigned(var) {
                continue;
            }

            // Negative literal checked before positive, matching this heuristic's tie-break: the
            // first literal seen at the maximum count wins.
            for &negative in &[true, false] {
                let lit = var.lit(negative);
                let count = ctx
                    .watchlist
                    .get(lit)
                    .iter()
                    .filter(|&&clause_idx| possibly_unsatisfied(ctx, clause_idx))
                    .count();

                if best.map_or(true, |(best_count, _)| count > best_count) {
                    best = Some((count, lit));
                }
            }
        }

        best.expect("pick called with no unassigned variable").1
    }

    fn on_assign(&mut self, _var: Var, _positive: bool) {}
    fn on_learnt(&mut self, _literals: &[Lit]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::Assignment;
    use crate::clause::ClauseDb;
    use crate::watch::Watchlist;
    use cdsat_formula::{lits, var};

    #[test]
    fn picks_literal_with_most_unsatisfied_watching_clauses() {
        let mut clause_db = ClauseDb::default();
        let mut watchlist = Watchlist::default();
        watchlist.ensure_var_count(2);

        // Two clauses watch the positive literal of variable 1, none watch the negative one.
        let c1 = clause_db.add_original(lits![1, 2].to_vec());
        let c2 = clause_db.add_original(lits![1, -2].to_vec());
        for &c in &[c1, c2] {
            let (a, b) = clause_db.get(c).watches();
            watchlist.add(a, c);
            watchlist.add(b, c);
        }

        let assignment = Assignment::default();
        let mut dlis = Dlis::default();
        let ctx = DecisionContext {
            assignment: &assignment,
            watchlist: &watchlist,
            clause_db: &clause_db,
            var_count: 2,
        };

        let picked = dlis.pick(&ctx);
        assert_eq!(picked, lits![1][0]);
    }
}
