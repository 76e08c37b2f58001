//! Luby-scheduled restarts.
use super::luby::luby;

/// Tracks when the search should restart (backjump all the way to level 0).
///
/// The interval between restarts grows following the Luby sequence scaled by a base constant, so
/// restarts start frequent and become increasingly rare, which is known to be close to optimal
/// without any problem-specific tuning.
pub struct RestartScheduler {
    base: u64,
    restart_count: u64,
    conflicts_since_restart: u64,
    restart_limit: u64,
}

impl RestartScheduler {
    pub fn new(base: u64) -> RestartScheduler {
        let restart_count = 0;
        RestartScheduler {
            base,
            restart_count,
            conflicts_since_restart: 0,
            restart_limit: base * luby(restart_count + 1),
        }
    }

    /// Record that a conflict occurred.
    pub fn on_conflict(&mut self) {
        self.conflicts_since_restart += 1;
    }

    /// Whether the search should restart now.
    pub fn should_restart(&self) -> bool {
        self.conflicts_since_restart > self.restart_limit
    }

    /// Record that a restart just happened and advance the schedule.
    pub fn on_restart(&mut self) {
        self.restart_count += 1;
        self.restart_limit = self.base * luby(self.restart_count + 1);
        self.conflicts_since_restart = 0;
    }
}
