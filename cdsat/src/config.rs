//! Solver configuration.
use serde::Deserialize;

/// Which decision heuristic to use for branching.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    /// Variable State Independent Decaying Sum, the default CDCL heuristic.
    Vsids,
    /// Dynamic Largest Individual Sum, counts unsatisfied watched clauses per literal.
    Dlis,
    /// Deterministic placeholder heuristic, always picks the first unassigned variable.
    Random,
}

impl Default for Heuristic {
    fn default() -> Heuristic {
        Heuristic::Vsids
    }
}

/// Configurable parameters used during solving.
pub struct SolverConfig {
    /// Multiplicative decay applied to the VSIDS activity bump after every learnt clause.
    pub vsids_decay: f64,

    /// Multiplicative decay applied to the learnt-clause activity bump after every conflict.
    pub clause_activity_decay: f64,

    /// Base interval (in conflicts) scaled by the Luby sequence to schedule restarts.
    pub restart_base: u64,

    /// Base interval (in conflicts) scaled by the Luby sequence to schedule clause forgetting.
    pub forget_base: u64,

    /// Decision heuristic used to pick branching literals.
    pub heuristic: Heuristic,

    /// Whether Luby-scheduled restarts are enabled.
    pub restarts: bool,

    /// Whether learnt-clause forgetting is enabled.
    pub forgets: bool,

    /// Wall-clock timeout in seconds, if any.
    pub timeout: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            vsids_decay: 0.95,
            clause_activity_decay: 0.95,
            restart_base: 80,
            forget_base: 400,
            heuristic: Heuristic::Vsids,
            restarts: true,
            forgets: true,
            timeout: None,
        }
    }
}

/// A partial configuration overlay, as read from a TOML document.
///
/// Fields left unset keep the value already present in the [`SolverConfig`] being updated.
#[derive(Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SolverConfigUpdate {
    pub vsids_decay: Option<f64>,
    pub clause_activity_decay: Option<f64>,
    pub restart_base: Option<u64>,
    pub forget_base: Option<u64>,
    pub heuristic: Option<Heuristic>,
    pub restarts: Option<bool>,
    pub forgets: Option<bool>,
    pub timeout: Option<f64>,
}

impl SolverConfigUpdate {
    /// Create an empty overlay that leaves every field of a config unchanged.
    pub fn new() -> SolverConfigUpdate {
        SolverConfigUpdate::default()
    }

    /// Merge another overlay on top of this one, with `other` taking precedence.
    pub fn merge(&mut self, other: SolverConfigUpdate) {
        macro_rules! merge_field {
            ($field:ident) => {
                if other.$field.is_some() {
                    self.$field = other.$field;
                }
            };
        }
        merge_field!(vsids_decay);
        merge_field!(clause_activity_decay);
        merge_field!(restart_base);
        merge_field!(forget_base);
        merge_field!(heuristic);
        merge_field!(restarts);
        merge_field!(forgets);
        merge_field!(timeout);
    }

    /// Apply this overlay to a config, leaving unset fields untouched.
    pub fn apply_to(&self, config: &mut SolverConfig) {
        if let Some(value) = self.vsids_decay {
            config.vsids_decay = value;
        }
        if let Some(value) = self.clause_activity_decay {
            config.clause_activity_decay = value;
        }
        if let Some(value) = self.restart_base {
            config.restart_base = value;
        }
        if let Some(value) = self.forget_base {
            config.forget_base = value;
        }
        if let Some(value) = self.heuristic {
            config.heuristic = value;
        }
        if let Some(value) = self.restarts {
            config.restarts = value;
        }
        if let Some(value) = self.forgets {
            config.forgets = value;
        }
        if self.timeout.is_some() {
            config.timeout = self.timeout;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.vsids_decay, 0.95);
        assert_eq!(config.restart_base, 80);
        assert_eq!(config.forget_base, 400);
        assert_eq!(config.heuristic, Heuristic::Vsids);
        assert!(config.restarts);
        assert!(config.forgets);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn update_overrides_only_set_fields() {
        let mut config = SolverConfig::default();

        let mut update = SolverConfigUpdate::new();
        update.merge(toml::from_str("restarts = false").unwrap());
        update.apply_to(&mut config);

        assert!(!config.restarts);
        assert_eq!(config.vsids_decay, 0.95);
    }

    #[test]
    fn later_merge_wins() {
        let mut update = SolverConfigUpdate::new();
        update.merge(toml::from_str("vsids-decay = 0.9").unwrap());
        update.merge(toml::from_str("vsids-decay = 0.8").unwrap());

        assert_eq!(update.vsids_decay, Some(0.8));
    }
}
