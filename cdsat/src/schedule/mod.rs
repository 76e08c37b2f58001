//! Restart and clause-forgetting schedules.
pub mod forget;
pub mod luby;
pub mod restart;

pub use forget::ClauseForgetter;
pub use restart::RestartScheduler;
