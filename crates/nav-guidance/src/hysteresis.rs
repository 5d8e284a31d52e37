//! Dead-band turn classifier.
//!
//! A single threshold on a noisy relative bearing makes the arrow flicker
//! between "straight" and "turn" whenever the user walks near the boundary.
//! The classifier below uses two thresholds instead.  Leaving `Straight`
//! requires the bearing to pass the outer `enter_deg` boundary; coming back
//! requires it to fall inside the inner `exit_deg` boundary.  Anything in
//! between keeps the previous decision.
//!
//! ```text
//!              exit   enter                      360-enter  360-exit
//!   0 ─ Straight ─|──dead──|──── Right ────|180|──── Left ────|──dead──|─ Straight ─ 360
//! ```

use nav_core::{HysteresisConfig, TurnDirection};

/// Holds the last turn decision; it is the only state in the engine whose
/// previous value affects the next output.
#[derive(Clone, Debug)]
pub struct TurnHysteresis {
    config:  HysteresisConfig,
    current: TurnDirection,
}

impl TurnHysteresis {
    pub fn new(config: HysteresisConfig) -> Self {
        Self {
            config,
            current: TurnDirection::Straight,
        }
    }

    /// Classify `relative_deg` (in `[0, 360)`) and remember the result.
    ///
    /// Only ever returns `Straight`, `Left`, or `Right`.
    pub fn update(&mut self, relative_deg: f64) -> TurnDirection {
        let enter = self.config.enter_deg;
        let exit = self.config.exit_deg;
        let back_on_course = relative_deg <= exit || relative_deg >= 360.0 - exit;

        self.current = match self.current {
            TurnDirection::Right => {
                if back_on_course {
                    TurnDirection::Straight
                } else if relative_deg > 180.0 {
                    TurnDirection::Left
                } else {
                    TurnDirection::Right
                }
            }
            TurnDirection::Left => {
                if back_on_course {
                    TurnDirection::Straight
                } else if relative_deg < 180.0 {
                    TurnDirection::Right
                } else {
                    TurnDirection::Left
                }
            }
            // TurnAround is a display overlay and is never stored.
            TurnDirection::Straight | TurnDirection::TurnAround => {
                if relative_deg > enter && relative_deg < 180.0 {
                    TurnDirection::Right
                } else if relative_deg > 180.0 && relative_deg < 360.0 - enter {
                    TurnDirection::Left
                } else {
                    TurnDirection::Straight
                }
            }
        };
        self.current
    }

    #[inline]
    pub fn current(&self) -> TurnDirection {
        self.current
    }

    /// Forget the previous decision.
    pub fn reset(&mut self) {
        self.current = TurnDirection::Straight;
    }
}

impl Default for TurnHysteresis {
    fn default() -> Self {
        Self::new(HysteresisConfig::default())
    }
}
