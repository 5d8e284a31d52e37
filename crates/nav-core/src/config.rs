//! Engine configuration.
//!
//! Every tunable constant of the engine lives in [`NavConfig`].  The defaults
//! are the empirically tuned values the campus app shipped with; none of them
//! has been validated for general outdoor walking, so deployments may load
//! overrides from a RON file:
//!
//! ```ron
//! (
//!     max_accuracy_m: 30.0,
//!     hysteresis: (enter_deg: 55.0, exit_deg: 35.0),
//! )
//! ```
//!
//! Fields missing from the file keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::eta::DEFAULT_WALKING_SPEED_M_PER_MIN;
use crate::{Destination, NavError, NavResult};

/// Fixes reporting a worse accuracy than this are dropped, metres.
pub const DEFAULT_MAX_ACCURACY_M: f64 = 50.0;
/// Low-pass factor for the compass; higher is more responsive.
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.3;
/// Arrival radius used when the caller does not supply one, metres.
pub const DEFAULT_ARRIVAL_RADIUS_M: f64 = 15.0;

// ── Sections ──────────────────────────────────────────────────────────────────

/// Dead band of the turn classifier.
///
/// Leaving `Straight` needs `|relative| > enter_deg`; returning to it needs
/// `|relative| <= exit_deg`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HysteresisConfig {
    pub enter_deg: f64,
    pub exit_deg:  f64,
}

impl Default for HysteresisConfig {
    fn default() -> Self {
        Self { enter_deg: 50.0, exit_deg: 40.0 }
    }
}

/// Open interval of relative bearings labelled `TurnAround`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnAroundWindow {
    pub min_deg: f64,
    pub max_deg: f64,
}

impl TurnAroundWindow {
    #[inline]
    pub fn contains(&self, relative_deg: f64) -> bool {
        relative_deg > self.min_deg && relative_deg < self.max_deg
    }
}

impl Default for TurnAroundWindow {
    fn default() -> Self {
        Self { min_deg: 135.0, max_deg: 225.0 }
    }
}

/// Options handed to a position source when watching starts.
///
/// Mirrors the watch options of browser and mobile geolocation APIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchOptions {
    /// Ask the provider for its most precise mode.
    pub high_accuracy: bool,
    /// Oldest cached fix the provider may hand back; 0 demands a fresh one.
    pub max_age_ms:    u64,
    /// How long the provider may take to produce each fix.
    pub timeout_ms:    u64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self { high_accuracy: true, max_age_ms: 0, timeout_ms: 5_000 }
    }
}

// ── NavConfig ─────────────────────────────────────────────────────────────────

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub max_accuracy_m:           f64,
    pub smoothing_alpha:          f64,
    pub hysteresis:               HysteresisConfig,
    pub turn_around:              TurnAroundWindow,
    pub walking_speed_m_per_min:  f64,
    pub default_arrival_radius_m: f64,
    pub watch:                    WatchOptions,
    /// Redraw period of the optional frame loop (≈ 60 Hz by default).
    pub frame_interval_ms:        u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            max_accuracy_m:           DEFAULT_MAX_ACCURACY_M,
            smoothing_alpha:          DEFAULT_SMOOTHING_ALPHA,
            hysteresis:               HysteresisConfig::default(),
            turn_around:              TurnAroundWindow::default(),
            walking_speed_m_per_min:  DEFAULT_WALKING_SPEED_M_PER_MIN,
            default_arrival_radius_m: DEFAULT_ARRIVAL_RADIUS_M,
            watch:                    WatchOptions::default(),
            frame_interval_ms:        16,
        }
    }
}

impl NavConfig {
    /// Parse a RON document and validate the result.
    pub fn from_ron_str(text: &str) -> NavResult<Self> {
        let config: NavConfig = ron::from_str(text).map_err(|e| NavError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a RON file.
    pub fn load(path: &Path) -> NavResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Build a destination as supplied by search or map selection, falling
    /// back to `default_arrival_radius_m` when no radius is given.
    pub fn destination(
        &self,
        lat:              f64,
        lon:              f64,
        name:             impl Into<String>,
        arrival_radius_m: Option<f64>,
    ) -> Destination {
        Destination::new(lat, lon, name)
            .with_arrival_radius(arrival_radius_m.unwrap_or(self.default_arrival_radius_m))
    }

    /// Check every field for a usable value.
    pub fn validate(&self) -> NavResult<()> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(NavError::Config(format!(
                "smoothing_alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            )));
        }
        let h = self.hysteresis;
        if !(h.exit_deg >= 0.0 && h.exit_deg < h.enter_deg && h.enter_deg < 180.0) {
            return Err(NavError::Config(format!(
                "hysteresis needs 0 <= exit_deg < enter_deg < 180, got exit {} / enter {}",
                h.exit_deg, h.enter_deg
            )));
        }
        let t = self.turn_around;
        if !(t.min_deg > 0.0 && t.min_deg < t.max_deg && t.max_deg < 360.0) {
            return Err(NavError::Config(format!(
                "turn_around window must satisfy 0 < min < max < 360, got ({}, {})",
                t.min_deg, t.max_deg
            )));
        }
        positive("max_accuracy_m", self.max_accuracy_m)?;
        positive("walking_speed_m_per_min", self.walking_speed_m_per_min)?;
        positive("default_arrival_radius_m", self.default_arrival_radius_m)?;
        if self.frame_interval_ms == 0 {
            return Err(NavError::Config("frame_interval_ms must be non-zero".into()));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> NavResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(NavError::Config(format!("{field} must be a positive number, got {value}")))
    }
}
