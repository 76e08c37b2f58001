//! The trail of assigned literals, in assignment order.
use cdsat_formula::Lit;

use crate::assignment::Assignment;

/// Records the literals assigned so far, in order, together with where each decision level
/// begins and how far unit propagation has consumed the queue.
#[derive(Default)]
pub struct Trail {
    trail: Vec<Lit>,
    /// Index into `trail` of the next literal still to be propagated.
    queue_head: usize,
    /// `level_starts[level]` is the index into `trail` where that decision level begins.
    /// `level_starts[0]` is always 0 (the root level, containing only unit-implied literals).
    level_starts: Vec<usize>,
}

impl Trail {
    pub fn new() -> Trail {
        Trail {
            trail: Vec::new(),
            queue_head: 0,
            level_starts: vec![0],
        }
    }

    /// Literals assigned so far, in assignment order.
    pub fn trail(&self) -> &[Lit] {
        &self.trail
    }

    /// The decision level currently being extended.
    pub fn current_level(&self) -> usize {
        self.level_starts.len() - 1
    }

    /// Record that a new decision is starting a fresh decision level.
    pub fn new_decision_level(&mut self) {
        self.level_starts.push(self.trail.len());
    }

    /// Append a freshly assigned literal to the trail.
    pub fn push(&mut self, lit: Lit) {
        self.trail.push(lit);
    }

    /// The next literal whose implications have not yet been propagated, if any.
    pub fn pop_queue(&mut self) -> Option<Lit> {
        if self.queue_head < self.trail.len() {
            let lit = self.trail[self.queue_head];
            self.queue_head += 1;
            Some(lit)
        } else {
            None
        }
    }

    /// Whether every assigned literal has had its implications propagated.
    pub fn fully_propagated(&self) -> bool {
        self.queue_head == self.trail.len()
    }

    /// Undo every assignment above `target_level`, restoring the assignment store to match.
    ///
    /// `target_level` must not exceed the current level.
    pub fn backjump(&mut self, target_level: usize, assignment: &mut Assignment) {
        debug_assert!(target_level <= self.current_level());
        if let Some(&cut) = self.level_starts.get(target_level + 1) {
            for &lit in self.trail[cut..].iter() {
                assignment.unassign(lit.var());
            }
            self.trail.truncate(cut);
            self.level_starts.truncate(target_level + 1);
        }
        self.queue_head = self.queue_head.min(self.trail.len());
    }

    /// Total number of variables currently assigned.
    pub fn len(&self) -> usize {
        self.trail.len()
    }
}
