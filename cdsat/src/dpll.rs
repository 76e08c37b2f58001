//! A DPLL solver: the reduced sibling of the CDCL search engine, sharing the assignment store,
//! clause store, watchlist and propagation engine but replacing conflict analysis and
//! backjumping with plain chronological backtracking and no learning.
//!
//! Always branches with the [`Dlis`] heuristic: DPLL never restarts, so there is no decaying
//! activity state to maintain across a restart in the first place.
use cdsat_formula::{CnfFormula, Lit, Var};

use crate::assignment::Assignment;
use crate::clause::{ClauseDb, Reason};
use crate::decision::{DecisionContext, DecisionHeuristic, Dlis};
use crate::error::SolverError;
use crate::load::load_clause;
use crate::propagate::propagate;
use crate::search::Verdict;
use crate::trail::Trail;
use crate::watch::Watchlist;

/// A DPLL solver instance.
pub struct DpllSolver {
    var_count: usize,
    assignment: Assignment,
    trail: Trail,
    clause_db: ClauseDb,
    watchlist: Watchlist,
    heuristic: Dlis,
    unsat: bool,
}

impl DpllSolver {
    /// Build a DPLL solver from a formula, loading every clause.
    pub fn new(formula: &CnfFormula) -> Result<DpllSolver, SolverError> {
        if formula.var_count() > Var::max_count() {
            return Err(SolverError::VarIndexOutOfBounds(formula.var_count()));
        }

        let var_count = formula.var_count();
        let mut assignment = Assignment::default();
        assignment.ensure_var_count(var_count);
        let mut watchlist = Watchlist::default();
        watchlist.ensure_var_count(var_count);
        let mut trail = Trail::new();
        let mut clause_db = ClauseDb::default();
        let mut unsat = false;

        for clause in formula.iter() {
            if unsat {
                break;
            }
            if !load_clause(clause, &mut assignment, &mut trail, &mut clause_db, &mut watchlist) {
                unsat = true;
            }
        }

        Ok(DpllSolver {
            var_count,
            assignment,
            trail,
            clause_db,
            watchlist,
            heuristic: Dlis::default(),
            unsat,
        })
    }

    /// Decide satisfiability, returning a total model on `Verdict::Sat`.
    pub fn solve(&mut self) -> Verdict {
        if self.unsat {
            return Verdict::Unsat;
        }

        if self.search() {
            Verdict::Sat(self.extract_model())
        } else {
            Verdict::Unsat
        }
    }

    /// Propagate, then either report success, or branch on a fresh decision and recurse into both
    /// polarities, backtracking exactly one level between them.
    fn search(&mut self) -> bool {
        if propagate(
            &mut self.trail,
            &mut self.assignment,
            &mut self.clause_db,
            &mut self.watchlist,
        )
        .is_err()
        {
            return false;
        }

        if self.assignment.is_total() {
            return true;
        }

        let lit = {
            let ctx = DecisionContext {
                assignment: &self.assignment,
                watchlist: &self.watchlist,
                clause_db: &self.clause_db,
                var_count: self.var_count,
            };
            self.heuristic.pick(&ctx)
        };

        for candidate in [lit, !lit] {
            self.trail.new_decision_level();
            let level = self.trail.current_level();
            self.assignment.assign(candidate, level, Reason::Decision);
            self.trail.push(candidate);

            if self.search() {
                return true;
            }

            self.trail.backjump(level - 1, &mut self.assignment);
        }

        false
    }

    fn extract_model(&self) -> Vec<bool> {
        (0..self.var_count)
            .map(|index| {
                self.assignment
                    .var_value(Var::from_index(index))
                    .expect("a total assignment has a value for every variable")
            })
            .collect()
    }
}

/// Decide satisfiability of `formula` using the DPLL variant.
pub fn solve(formula: &CnfFormula) -> Result<Verdict, SolverError> {
    DpllSolver::new(formula).map(|mut solver| solver.solve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdsat_formula::cnf_formula;

    fn satisfies(formula: &CnfFormula, model: &[bool]) -> bool {
        formula.iter().all(|clause| {
            clause
                .iter()
                .any(|&lit| model[lit.var().index()] != lit.is_negative())
        })
    }

    #[test]
    fn empty_formula_is_sat() {
        assert_eq!(solve(&CnfFormula::new()).unwrap(), Verdict::Sat(vec![]));
    }

    #[test]
    fn empty_clause_is_unsat() {
        let formula = cnf_formula![;];
        assert_eq!(solve(&formula).unwrap(), Verdict::Unsat);
    }

    #[test]
    fn s1_small_unsat() {
        let formula = cnf_formula![1, 2; -1, 2; -2;];
        assert_eq!(solve(&formula).unwrap(), Verdict::Unsat);
    }

    #[test]
    fn s2_unit_propagation_chain() {
        let formula = cnf_formula![1; -1, 2; -2, 3;];
        match solve(&formula).unwrap() {
            Verdict::Sat(model) => assert_eq!(model, vec![true, true, true]),
            Verdict::Unsat => panic!("expected SAT"),
        }
    }

    #[test]
    fn s4_pigeonhole_unsat() {
        let formula = cdsat_formula::test::pigeonhole(3, 2);
        assert_eq!(solve(&formula).unwrap(), Verdict::Unsat);
    }

    #[test]
    fn s5_odd_cycle_variant_sat() {
        let formula = cnf_formula![1, -2; 2, -3; 3, -1; -1, -2, -3; 1, 2, 3;];
        match solve(&formula).unwrap() {
            Verdict::Sat(model) => assert!(satisfies(&formula, &model)),
            Verdict::Unsat => panic!("expected SAT"),
        }
    }
}
