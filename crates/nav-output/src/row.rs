//! Flat row types written by every backend.

use nav_core::{Millis, NavigationState};
use nav_sensors::{RejectReason, Rejected};
use nav_session::SessionPhase;

/// One emitted [`NavigationState`].
#[derive(Clone, Debug, PartialEq)]
pub struct StateRow {
    /// 0-based emission index within the trace.
    pub seq:                  u64,
    pub recorded_at_ms:       u64,
    pub distance_m:           f64,
    pub bearing_deg:          f64,
    pub relative_bearing_deg: f64,
    pub turn_direction:       &'static str,
    pub is_on_track:          bool,
    pub arrived:              bool,
    pub eta_label:            String,
    pub gps_accuracy_m:       f64,
    pub heading_available:    bool,
}

impl StateRow {
    pub fn new(seq: u64, recorded_at: Millis, state: &NavigationState) -> Self {
        Self {
            seq,
            recorded_at_ms:       recorded_at.0,
            distance_m:           state.distance_m,
            bearing_deg:          state.bearing_deg,
            relative_bearing_deg: state.relative_bearing_deg,
            turn_direction:       state.turn_direction.as_str(),
            is_on_track:          state.is_on_track,
            arrived:              state.arrived,
            eta_label:            state.eta_label.clone(),
            gps_accuracy_m:       state.gps_accuracy_m,
            heading_available:    state.heading_available,
        }
    }
}

/// One lifecycle transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseRow {
    pub recorded_at_ms: u64,
    pub from:           String,
    pub to:             String,
}

impl PhaseRow {
    pub fn new(recorded_at: Millis, from: SessionPhase, to: SessionPhase) -> Self {
        Self {
            recorded_at_ms: recorded_at.0,
            from:           from.to_string(),
            to:             to.to_string(),
        }
    }
}

/// One fix dropped by the accuracy filter.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectionRow {
    pub recorded_at_ms: u64,
    pub lat:            f64,
    pub lon:            f64,
    pub accuracy_m:     f64,
    /// `inaccurate` or `invalid_coordinates`.
    pub reason:         &'static str,
}

impl RejectionRow {
    pub fn new(recorded_at: Millis, rejected: &Rejected) -> Self {
        Self {
            recorded_at_ms: recorded_at.0,
            lat:            rejected.fix.point.lat,
            lon:            rejected.fix.point.lon,
            accuracy_m:     rejected.fix.accuracy_m,
            reason:         match rejected.reason {
                RejectReason::Inaccurate { .. }   => "inaccurate",
                RejectReason::InvalidCoordinates => "invalid_coordinates",
            },
        }
    }
}
