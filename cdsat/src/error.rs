//! Errors produced by the solver core.

/// Errors that can occur while using the solver, as opposed to conflicts and unsatisfiability,
/// which are reported as ordinary search outcomes.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// A literal referenced a variable beyond what the solver can represent.
    #[error("variable {0} is beyond the maximum supported index {}", cdsat_formula::Var::max_count())]
    VarIndexOutOfBounds(usize),

    /// The configured timeout elapsed before a verdict was reached.
    #[error("solving timed out")]
    Timeout,
}
