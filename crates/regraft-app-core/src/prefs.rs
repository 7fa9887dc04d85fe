// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved replacer preferences shared by regraft tools.

use regraft_core::{CategorySet, FilterOptions};
use serde::{Deserialize, Serialize};

/// Config-store key under which [`ReplacerPrefs`] are persisted.
pub const PREFS_KEY: &str = "replacer-prefs";

/// Saved preferences for a replacer session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReplacerPrefs {
    /// Filter toggles restored at session start.
    pub filter: FilterOptions,
    /// Category mask last used in the candidate panel.
    pub last_categories: CategorySet,
    /// Confirm before running a batch that touches more edges than this
    /// (zero disables the prompt).
    pub confirm_above: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefs_round_trip_as_json() {
        let prefs = ReplacerPrefs {
            confirm_above: 250,
            ..ReplacerPrefs::default()
        };
        let json = serde_json::to_string(&prefs).unwrap();
        let back: ReplacerPrefs = serde_json::from_str(&json).unwrap();
        assert_eq!(back.confirm_above, 250);
        assert_eq!(back.filter, prefs.filter);
    }
}
