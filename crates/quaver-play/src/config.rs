use serde::{Deserialize, Serialize};

use crate::error::PlayError;
use crate::judge::HitWindows;

/// Play-specific configuration.
/// Controls timing windows and judge adjustment during gameplay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayConfig {
    /// PERFECT window in seconds.
    #[serde(default = "default_perfect_window")]
    pub perfect_window: f64,
    /// GREAT window in seconds.
    #[serde(default = "default_great_window")]
    pub great_window: f64,
    /// GOOD window in seconds.
    #[serde(default = "default_good_window")]
    pub good_window: f64,
    /// BAD window in seconds; also the auto-miss boundary.
    #[serde(default = "default_bad_window")]
    pub bad_window: f64,
    /// Judge timing adjustment in milliseconds (negative = early, positive = late).
    #[serde(default)]
    pub judge_timing: i32,
}

fn default_perfect_window() -> f64 {
    0.025
}

fn default_great_window() -> f64 {
    0.045
}

fn default_good_window() -> f64 {
    0.080
}

fn default_bad_window() -> f64 {
    0.120
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            perfect_window: default_perfect_window(),
            great_window: default_great_window(),
            good_window: default_good_window(),
            bad_window: default_bad_window(),
            judge_timing: 0,
        }
    }
}

impl PlayConfig {
    /// Parse a config from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate the window thresholds into a [`HitWindows`]. Fails fast on a
    /// non-ascending configuration.
    pub fn hit_windows(&self) -> Result<HitWindows, PlayError> {
        HitWindows::new(
            self.perfect_window,
            self.great_window,
            self.good_window,
            self.bad_window,
        )
    }
}
