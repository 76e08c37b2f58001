//! The CDCL search engine: orchestrates decisions, propagation, conflict analysis, backjumping,
//! restarts and learnt-clause forgetting.
use std::time::Instant;

use log::{debug, info};

use cdsat_formula::{CnfFormula, Lit, Var};

use crate::analyze::{analyze, second_highest_level};
use crate::assignment::Assignment;
use crate::clause::{ClauseDb, Reason};
use crate::config::{Heuristic, SolverConfig};
use crate::decision::{DecisionContext, DecisionHeuristic, Dlis, RandomChoice, Vsids};
use crate::error::SolverError;
use crate::load::load_clause;
use crate::propagate::propagate;
use crate::schedule::{ClauseForgetter, RestartScheduler};
use crate::trail::Trail;
use crate::watch::Watchlist;

/// The outcome of a solving attempt: either the formula is satisfiable, in which case a total
/// assignment (indexed by 0-based variable index) satisfying every original clause is returned, or
/// it is unsatisfiable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Sat(Vec<bool>),
    Unsat,
}

fn new_heuristic(heuristic: Heuristic, var_count: usize, vsids_decay: f64) -> Box<dyn DecisionHeuristic> {
    match heuristic {
        Heuristic::Vsids => Box::new(Vsids::new(var_count, vsids_decay)),
        Heuristic::Dlis => Box::new(Dlis::default()),
        Heuristic::Random => Box::new(RandomChoice::default()),
    }
}

/// A single-threaded CDCL SAT solver.
pub struct Solver {
    config: SolverConfig,
    var_count: usize,
    assignment: Assignment,
    trail: Trail,
    clause_db: ClauseDb,
    watchlist: Watchlist,
    heuristic: Box<dyn DecisionHeuristic>,
    restart_scheduler: RestartScheduler,
    forgetter: ClauseForgetter,
    /// Set once loading or search has proven the formula unsatisfiable; once set, every further
    /// operation is a no-op.
    unsat: bool,
}

impl Solver {
    /// Create a solver with the given configuration and no clauses loaded yet.
    pub fn new(config: SolverConfig) -> Solver {
        let heuristic = new_heuristic(config.heuristic, 0, config.vsids_decay);
        let restart_scheduler = RestartScheduler::new(config.restart_base);
        let forgetter = ClauseForgetter::new(config.forget_base, config.clause_activity_decay);
        Solver {
            config,
            var_count: 0,
            assignment: Assignment::default(),
            trail: Trail::new(),
            clause_db: ClauseDb::default(),
            watchlist: Watchlist::default(),
            heuristic,
            restart_scheduler,
            forgetter,
            unsat: false,
        }
    }

    /// Grow the solver's supported variable count to at least `var_count`.
    fn grow_to(&mut self, var_count: usize) {
        if var_count > self.var_count {
            self.var_count = var_count;
            self.assignment.ensure_var_count(var_count);
            self.watchlist.ensure_var_count(var_count);
        }
    }

    /// Add every clause of `formula` to the solver.
    ///
    /// Grows the solver's variable count to match the formula's if necessary.
    pub fn add_formula(&mut self, formula: &CnfFormula) -> Result<(), SolverError> {
        if formula.var_count() > Var::max_count() {
            return Err(SolverError::VarIndexOutOfBounds(formula.var_count()));
        }
        self.grow_to(formula.var_count());

        for clause in formula.iter() {
            self.add_clause(clause);
        }
        Ok(())
    }

    /// Add a single clause, given as a slice of literals.
    pub fn add_clause(&mut self, literals: &[Lit]) {
        if self.unsat {
            return;
        }
        if !load_clause(
            literals,
            &mut self.assignment,
            &mut self.trail,
            &mut self.clause_db,
            &mut self.watchlist,
        ) {
            self.unsat = true;
        }
    }

    /// The number of variables currently supported.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// Search for a satisfying assignment, or prove the loaded formula unsatisfiable.
    pub fn solve(&mut self) -> Result<Verdict, SolverError> {
        let start = Instant::now();
        let verdict = self.solve_inner(start)?;
        info!(
            "cdsat: {:?} in {:.3}s",
            match &verdict {
                Verdict::Sat(_) => "SAT",
                Verdict::Unsat => "UNSAT",
            },
            start.elapsed().as_secs_f64()
        );
        Ok(verdict)
    }

    fn solve_inner(&mut self, start: Instant) -> Result<Verdict, SolverError> {
        if self.unsat {
            return Ok(Verdict::Unsat);
        }

        loop {
            if let Some(timeout) = self.config.timeout {
                if start.elapsed().as_secs_f64() >= timeout {
                    return Err(SolverError::Timeout);
                }
            }

            match propagate(
                &mut self.trail,
                &mut self.assignment,
                &mut self.clause_db,
                &mut self.watchlist,
            ) {
                Ok(()) => {
                    if self.assignment.is_total() {
                        return Ok(Verdict::Sat(self.extract_model()));
                    }
                    self.maybe_restart();
                    self.decide();
                }
                Err(reason) => {
                    let conflict_idx = match reason {
                        Reason::Clause(idx) => idx,
                        _ => unreachable!("a conflict's reason is always a clause"),
                    };
                    if self.trail.current_level() == 0 {
                        return Ok(Verdict::Unsat);
                    }
                    self.resolve_conflict(conflict_idx);
                }
            }
        }
    }

    fn decide(&mut self) {
        let ctx = DecisionContext {
            assignment: &self.assignment,
            watchlist: &self.watchlist,
            clause_db: &self.clause_db,
            var_count: self.var_count,
        };
        let lit = self.heuristic.pick(&ctx);

        self.trail.new_decision_level();
        let level = self.trail.current_level();
        self.assignment.assign(lit, level, Reason::Decision);
        self.trail.push(lit);
        self.heuristic.on_assign(lit.var(), lit.is_positive());
    }

    fn maybe_restart(&mut self) {
        if !self.config.restarts || !self.restart_scheduler.should_restart() {
            return;
        }

        self.trail.backjump(0, &mut self.assignment);
        self.restart_scheduler.on_restart();
        debug!("cdsat: restart");

        if self.config.forgets && self.forgetter.should_forget() {
            self.forget_clauses();
            self.forgetter.on_forget();
        }
    }

    fn forget_clauses(&mut self) {
        let to_forget = self
            .forgetter
            .choose_clauses_to_forget(&self.clause_db, &self.assignment);
        debug!("cdsat: forgetting {} learnt clauses", to_forget.len());
        for idx in to_forget {
            let (w1, w2) = self.clause_db.get(idx).watches();
            self.watchlist.remove(w1, idx);
            self.watchlist.remove(w2, idx);
            self.clause_db.forget(idx);
        }
    }

    fn resolve_conflict(&mut self, conflict_idx: usize) {
        self.restart_scheduler.on_conflict();
        self.forgetter.on_conflict();

        let conflict_level = self.trail.current_level();
        let (learnt, uip) = analyze(
            conflict_idx,
            conflict_level,
            &self.trail,
            &self.assignment,
            &self.clause_db,
            &mut self.forgetter,
        );
        self.heuristic.on_learnt(&learnt);

        if learnt.len() == 1 {
            self.trail.backjump(0, &mut self.assignment);
            self.assignment.assign(uip, 0, Reason::GlobalUnit);
            self.trail.push(uip);
            return;
        }

        let backjump_level = second_highest_level(&learnt, &self.assignment);
        self.trail.backjump(backjump_level, &mut self.assignment);

        let assignment = &self.assignment;
        let idx = self
            .clause_db
            .add_learnt(learnt, uip, |lit| assignment.level(lit.var()).unwrap_or(backjump_level));
        let (w1, w2) = self.clause_db.get(idx).watches();
        self.watchlist.add(w1, idx);
        self.watchlist.add(w2, idx);

        self.assignment.assign(uip, backjump_level, Reason::Clause(idx));
        self.trail.push(uip);
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
