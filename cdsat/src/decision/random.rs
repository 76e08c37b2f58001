//! Placeholder "random" heuristic: deterministic, always picks the first unassigned variable.
use cdsat_formula::{Lit, Var};

use super::{DecisionContext, DecisionHeuristic};

/// A baseline heuristic with no learned state and no actual randomness.
///
/// The source this is modeled on calls this heuristic "random" but its implementation always
/// walks variables in index order and takes the first unassigned one with positive polarity; kept
/// as such rather than wired up to an actual RNG, since introducing real randomness would change
/// observable behavior no caller has asked for.
#[derive(Default)]
pub struct RandomChoice;

impl DecisionHeuristic for RandomChoice {
    fn pick(&mut self, ctx: &DecisionContext) -> Lit {
        for index in 0..ctx.var_count {
            let var = Var::from_index(index);
            if !ctx.assignment.is_assigned(var) {
                return var.lit(false);
            }
        }
        unreachable!("pick called with no unassigned variable")
    }

    fn on_assign(&mut self, _var: Var, _positive: bool) {}
    fn on_learnt(&mut self, _literals: &[Lit]) {}
}
