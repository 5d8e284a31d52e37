//! The guidance state machine.

use log::{debug, info};

use nav_core::{
    Destination, GeoPoint, HeadingReading, NavConfig, NavigationState, TurnAroundWindow,
    TurnDirection, bearing_deg, distance_m, eta_label, relative_bearing,
};

use crate::TurnHysteresis;

/// Combines a filtered position, a smoothed heading, and a destination into
/// a [`NavigationState`].
///
/// Owns the turn hysteresis and the arrival latch.  One instance serves one
/// destination; [`reset`][Self::reset] before reusing it for another.
#[derive(Clone, Debug)]
pub struct GuidanceStateMachine {
    hysteresis:              TurnHysteresis,
    turn_around:             TurnAroundWindow,
    walking_speed_m_per_min: f64,
    arrived:                 bool,
    last:                    Option<NavigationState>,
}

impl GuidanceStateMachine {
    pub fn new(config: &NavConfig) -> Self {
        Self {
            hysteresis:              TurnHysteresis::new(config.hysteresis),
            turn_around:             config.turn_around,
            walking_speed_m_per_min: config.walking_speed_m_per_min,
            arrived:                 false,
            last:                    None,
        }
    }

    /// Recompute guidance.
    ///
    /// Returns `None`, leaving the last state in place, when:
    /// - `position` or `destination` is missing or has invalid coordinates;
    /// - an arrival has already been reported.
    pub fn update(
        &mut self,
        position:    Option<GeoPoint>,
        heading:     HeadingReading,
        destination: Option<&Destination>,
        accuracy_m:  f64,
    ) -> Option<NavigationState> {
        if self.arrived {
            return None;
        }
        let (position, destination) = match (position, destination) {
            (Some(p), Some(d)) if p.is_valid() && d.point.is_valid() => (p, d),
            _ => return None,
        };

        let distance = distance_m(position, destination.point);
        let bearing = bearing_deg(position, destination.point);
        let relative = relative_bearing(bearing, heading.degrees());

        // Without a compass the relative bearing is against north, not the
        // user: show no turn and leave the held decision alone.
        let (shown, is_on_track) = if heading.is_available() {
            let held = self.hysteresis.update(relative);
            let shown = if self.turn_around.contains(relative) {
                TurnDirection::TurnAround
            } else {
                held
            };
            (shown, held == TurnDirection::Straight)
        } else {
            (TurnDirection::Straight, false)
        };

        let arrival_threshold = destination.arrival_radius_m.max(accuracy_m);
        let arrived = distance < arrival_threshold;

        let state = NavigationState {
            distance_m:           distance,
            bearing_deg:          bearing,
            relative_bearing_deg: relative,
            turn_direction:       shown,
            is_on_track,
            arrived,
            eta_label:            eta_label(distance, self.walking_speed_m_per_min),
            gps_accuracy_m:       accuracy_m,
            heading_available:    heading.is_available(),
        };

        if arrived {
            self.arrived = true;
            info!(
                "arrived at {} ({distance:.1} m, threshold {arrival_threshold:.1} m)",
                destination.name
            );
        } else {
            debug!(
                "{distance:.1} m to {}, bearing {bearing:.1}°, relative {relative:.1}° -> {shown}",
                destination.name
            );
        }
        self.last = Some(state.clone());
        Some(state)
    }

    /// The most recent state produced, if any.
    #[inline]
    pub fn last(&self) -> Option<&NavigationState> {
        self.last.as_ref()
    }

    #[inline]
    pub fn has_arrived(&self) -> bool {
        self.arrived
    }

    /// The held turn decision (never `TurnAround`).
    #[inline]
    pub fn held_direction(&self) -> TurnDirection {
        self.hysteresis.current()
    }

    /// Clear the arrival latch, the hysteresis, and the last state.
    pub fn reset(&mut self) {
        self.hysteresis.reset();
        self.arrived = false;
        self.last = None;
    }
}
