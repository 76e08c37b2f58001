//! Variable State Independent Decaying Sum, the default decision heuristic.
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use cdsat_formula::{Lit, Var};

use super::{DecisionContext, DecisionHeuristic};

const MAX_ACTIVITY: f64 = 1e100;

/// Picks the unassigned variable with the highest activity, where activity is bumped whenever a
/// variable takes part in a learnt clause and decays over time so recent conflicts dominate.
///
/// The heap is allowed to hold stale entries: every bump pushes a fresh `(activity, var)` pair
/// without removing the old one, so `pick` has to pop entries lazily, discarding any whose
/// recorded activity no longer matches the variable's current activity (superseded by a later
/// bump) or that belong to an already-assigned variable, falling back to a linear scan if the
/// heap empties out without yielding a usable entry. This trades a larger heap for never having to
/// relocate entries on every bump.
pub struct Vsids {
    activity: Vec<f64>,
    heap: BinaryHeap<(OrderedFloat<f64>, u32)>,
    /// Last value each variable was assigned with, used as the preferred polarity. Defaults to
    /// `false` (negative) for variables never assigned yet.
    phase: Vec<bool>,
    bump: f64,
    decay: f64,
}

impl Vsids {
    pub fn new(var_count: usize, decay: f64) -> Vsids {
        let mut heap = BinaryHeap::with_capacity(var_count);
        for i in 0..var_count {
            heap.push((OrderedFloat(0.0), i as u32));
        }
        Vsids {
            activity: vec![0.0; var_count],
            heap,
            phase: vec![false; var_count],
            bump: 1.0,
            decay,
        }
    }

    fn ensure_var_count(&mut self, var_count: usize) {
        while self.activity.len() < var_count {
            let index = self.activity.len() as u32;
            self.activity.push(0.0);
            self.phase.push(false);
            self.heap.push((OrderedFloat(0.0), index));
        }
    }

    fn bump_var(&mut self, var: Var) {
        let index = var.index();
        self.activity[index] += self.bump;
        if self.activity[index] > MAX_ACTIVITY {
            self.normalize();
        }
        self.heap.push((OrderedFloat(self.activity[index]), index as u32));
    }

    fn normalize(&mut self) {
        for value in self.activity.iter_mut() {
            *value /= MAX_ACTIVITY;
        }
        self.bump /= MAX_ACTIVITY;
    }
}

impl DecisionHeuristic for Vsids {
    fn pick(&mut self, ctx: &DecisionContext) -> Lit {
        self.ensure_var_count(ctx.var_count);

        while let Some((OrderedFloat(recorded_activity), index)) = self.heap.pop() {
            let var = Var::from_index(index as usize);
            if ctx.assignment.is_assigned(var) {
                continue;
            }
            if recorded_activity != self.activity[index as usize] {
                continue;
            }
            return var.lit(!self.phase[index as usize]);
        }

        for index in 0..ctx.var_count {
            let var = Var::from_index(index);
            if !ctx.assignment.is_assigned(var) {
                return var.lit(!self.phase[index]);
            }
        }

        unreachable!("pick called with no unassigned variable")
    }

    fn on_assign(&mut self, var: Var, positive: bool) {
        self.ensure_var_count(var.index() + 1);
        self.phase[var.index()] = positive;
    }

    fn on_learnt(&mut self, literals: &[Lit]) {
        for &lit in literals {
            self.bump_var(lit.var());
        }
        self.bump /= self.decay;
    }
}
