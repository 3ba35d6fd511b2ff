//! Tunables for combat behavior.
//!
//! [`CombatConfig`] mirrors the `combat` section of `warband-config.yaml`.
//! Every field has a default, so a missing section is valid and callers
//! (overlords, tests) can override single values.

use serde::Deserialize;
use warband_types::TravelOptions;

/// Configuration shared by every combat overlord.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CombatConfig {
    /// Largest remaining-lifetime gap accepted when pairing agents
    /// (default: 600 ticks).
    #[serde(default = "default_partner_tolerance")]
    pub partner_tolerance: u32,

    /// Largest leader/follower separation before the follower must catch up
    /// (default: 1).
    #[serde(default = "default_allowed_range")]
    pub allowed_range: u32,

    /// Hit-point percentage below which a paired attacker retreats to the
    /// fallback position (default: 50).
    #[serde(default = "default_retreat_hits_pct")]
    pub retreat_hits_pct: u32,

    /// Confirm reachability before committing to a target (default: false).
    #[serde(default)]
    pub check_reachable: bool,

    /// Skip hostiles standing on exit tiles (default: true).
    #[serde(default = "default_true")]
    pub ignore_edge_hostiles: bool,

    /// Travel options used for every combat move.
    #[serde(default = "TravelOptions::combat")]
    pub move_options: TravelOptions,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            partner_tolerance: default_partner_tolerance(),
            allowed_range: default_allowed_range(),
            retreat_hits_pct: default_retreat_hits_pct(),
            check_reachable: false,
            ignore_edge_hostiles: true,
            move_options: TravelOptions::combat(),
        }
    }
}

const fn default_partner_tolerance() -> u32 {
    600
}

const fn default_allowed_range() -> u32 {
    1
}

const fn default_retreat_hits_pct() -> u32 {
    50
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config: CombatConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CombatConfig::default());
        assert!(config.move_options.allow_hostile);
        assert!(!config.move_options.moving_target);
    }

    #[test]
    fn single_values_override() {
        let config: CombatConfig =
            serde_json::from_str(r#"{"allowed_range": 2, "check_reachable": true}"#).unwrap();
        assert_eq!(config.allowed_range, 2);
        assert!(config.check_reachable);
        assert_eq!(config.partner_tolerance, 600);
    }
}
