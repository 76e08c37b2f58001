//! Watchlists, mapping each literal to the clauses that currently watch its negation.

use cdsat_formula::Lit;

/// For every literal, the indices (into the [`ClauseDb`](crate::clause::ClauseDb)) of clauses
/// watching that literal, i.e. clauses that would need re-checking if the literal became false.
#[derive(Default)]
pub struct Watchlist {
    watches: Vec<Vec<usize>>,
}

impl Watchlist {
    pub fn ensure_var_count(&mut self, var_count: usize) {
        let codes = var_count * 2;
        if self.watches.len() < codes {
            self.watches.resize(codes, Vec::new());
        }
    }

    pub fn add(&mut self, lit: Lit, clause_idx: usize) {
        self.watches[lit.code()].push(clause_idx);
    }

    pub fn remove(&mut self, lit: Lit, clause_idx: usize) {
        let list = &mut self.watches[lit.code()];
        if let Some(pos) = list.iter().position(|&idx| idx == clause_idx) {
            list.swap_remove(pos);
        }
    }

    /// Take the list of clauses watching `lit`, leaving an empty list behind.
    ///
    /// Used by the propagation loop, which rebuilds the list in place as it processes watchers
    /// (see [`crate::propagate::propagate`] for why this is needed: a conflict can be found
    /// partway through, and the unvisited watchers must not be lost).
    pub fn take(&mut self, lit: Lit) -> Vec<usize> {
        std::mem::take(&mut self.watches[lit.code()])
    }

    pub fn set(&mut self, lit: Lit, watchers: Vec<usize>) {
        self.watches[lit.code()] = watchers;
    }

    pub fn get(&self, lit: Lit) -> &[usize] {
        &self.watches[lit.code()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdsat_formula::lit;

    #[test]
    fn add_and_remove() {
        let mut watchlist = Watchlist::default();
        watchlist.ensure_var_count(2);

        let l = lit![1];
        watchlist.add(l, 0);
        watchlist.add(l, 1);
        assert_eq!(watchlist.get(l), &[0, 1]);

        watchlist.remove(l, 0);
        assert_eq!(watchlist.get(l), &[1]);
    }

    #[test]
    fn take_leaves_empty_list() {
        let mut watchlist = Watchlist::default();
        watchlist.ensure_var_count(1);

        let l = lit![1];
        watchlist.add(l, 5);

        let taken = watchlist.take(l);
        assert_eq!(taken, vec![5]);
        assert!(watchlist.get(l).is_empty());
    }
}
