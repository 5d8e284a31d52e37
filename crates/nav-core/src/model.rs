//! The engine's data model.
//!
//! Inputs ([`PositionFix`], [`HeadingSample`], [`Destination`]) flow in from
//! sensors and the caller; [`NavigationState`] is the only thing that flows
//! out.  Everything else the engine keeps is private to the component that
//! owns it.

use std::fmt;

use crate::config::DEFAULT_ARRIVAL_RADIUS_M;
use crate::geo::{GeoPoint, wrap_360};
use crate::time::Millis;

// ── Inputs ────────────────────────────────────────────────────────────────────

/// One GPS reading.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionFix {
    pub point:       GeoPoint,
    /// Reported horizontal uncertainty radius, metres (≥ 0).
    pub accuracy_m:  f64,
    pub captured_at: Millis,
}

impl PositionFix {
    #[inline]
    pub fn new(point: GeoPoint, accuracy_m: f64, captured_at: Millis) -> Self {
        Self { point, accuracy_m, captured_at }
    }
}

/// One raw compass reading, degrees clockwise from (true) north.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadingSample {
    /// Always in `[0, 360)` for finite input.
    pub degrees:     f64,
    pub captured_at: Millis,
}

impl HeadingSample {
    /// Build a sample, folding `degrees` into `[0, 360)`.
    pub fn new(degrees: f64, captured_at: Millis) -> Self {
        let degrees = if degrees.is_finite() { wrap_360(degrees) } else { degrees };
        Self { degrees, captured_at }
    }
}

/// Where the user is going.  Fixed for the lifetime of a session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Destination {
    pub point:            GeoPoint,
    pub name:             String,
    pub arrival_radius_m: f64,
}

impl Destination {
    /// A destination with the default arrival radius.
    pub fn new(lat: f64, lon: f64, name: impl Into<String>) -> Self {
        Self {
            point:            GeoPoint::new(lat, lon),
            name:             name.into(),
            arrival_radius_m: DEFAULT_ARRIVAL_RADIUS_M,
        }
    }

    pub fn with_arrival_radius(mut self, radius_m: f64) -> Self {
        self.arrival_radius_m = radius_m;
        self
    }

    /// Coordinates are finite and in range, and the radius is positive.
    pub fn is_valid(&self) -> bool {
        self.point.is_valid() && self.arrival_radius_m.is_finite() && self.arrival_radius_m > 0.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.point)
    }
}

/// The heading the guidance step should use.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HeadingReading {
    /// Smoothed compass heading, degrees.
    Available(f64),
    /// No compass: turn guidance is computed against north and flagged.
    Unavailable,
}

impl HeadingReading {
    /// Degrees to feed the bearing math; `0.0` when unavailable.
    #[inline]
    pub fn degrees(self) -> f64 {
        match self {
            HeadingReading::Available(d) => d,
            HeadingReading::Unavailable  => 0.0,
        }
    }

    #[inline]
    pub fn is_available(self) -> bool {
        matches!(self, HeadingReading::Available(_))
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Turn instruction shown to the user.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnDirection {
    #[default]
    Straight,
    Right,
    Left,
    /// Destination is roughly behind the user.
    TurnAround,
}

impl TurnDirection {
    /// Lower-case label, used for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            TurnDirection::Straight   => "straight",
            TurnDirection::Right      => "right",
            TurnDirection::Left       => "left",
            TurnDirection::TurnAround => "turn_around",
        }
    }
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of guidance, recomputed on every accepted sensor update.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationState {
    pub distance_m:           f64,
    /// Absolute bearing to the destination, `[0, 360)`.
    pub bearing_deg:          f64,
    /// Bearing relative to the user's heading, `[0, 360)`; 0 is dead ahead.
    pub relative_bearing_deg: f64,
    pub turn_direction:       TurnDirection,
    pub is_on_track:          bool,
    pub arrived:              bool,
    pub eta_label:            String,
    pub gps_accuracy_m:       f64,
    /// `false` when no compass is available.  Turn fields are then computed
    /// against north and should not be shown; distance and ETA still hold.
    pub heading_available:    bool,
}
