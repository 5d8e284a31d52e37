//! Wrap-aware low-pass filter for compass headings.
//!
//! Blending headings linearly breaks at north: averaging 350° and 10° gives
//! 180°, the exact opposite direction.  The smoother instead moves along the
//! signed shortest arc between the current estimate and the new sample:
//!
//! ```text
//! diff     = wrap_180(raw - smoothed)          // in [-180, 180]
//! smoothed = wrap_360(smoothed + alpha * diff)
//! ```
//!
//! The first sample after construction or [`recalibrate`][HeadingSmoother::recalibrate]
//! seeds the estimate directly, so the arrow does not sweep in from north.

use log::debug;

use nav_core::config::DEFAULT_SMOOTHING_ALPHA;
use nav_core::{HeadingSample, wrap_180, wrap_360};

/// Exponential smoother over a circular quantity.
#[derive(Clone, Debug)]
pub struct HeadingSmoother {
    alpha:    f64,
    smoothed: f64,
    seeded:   bool,
}

impl HeadingSmoother {
    /// `alpha` is clamped into `(0, 1]`; higher follows the compass more
    /// closely, lower is steadier but lags.
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_finite() {
            alpha.clamp(f64::EPSILON, 1.0)
        } else {
            DEFAULT_SMOOTHING_ALPHA
        };
        Self {
            alpha,
            smoothed: 0.0,
            seeded:   false,
        }
    }

    /// Fold one raw sample into the estimate and return the new smoothed
    /// heading in `[0, 360)`.  Non-finite samples are ignored.
    pub fn update(&mut self, sample: &HeadingSample) -> f64 {
        let raw = sample.degrees;
        if !raw.is_finite() {
            return self.smoothed;
        }
        if !self.seeded {
            self.smoothed = wrap_360(raw);
            self.seeded = true;
            return self.smoothed;
        }
        let diff = wrap_180(raw - self.smoothed);
        self.smoothed = wrap_360(self.smoothed + diff * self.alpha);
        self.smoothed
    }

    /// Current estimate; `0.0` before the first sample.
    #[inline]
    pub fn value(&self) -> f64 {
        self.smoothed
    }

    #[inline]
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Forget all history.  The estimate reads `0.0` until the next sample
    /// re-seeds it.
    pub fn recalibrate(&mut self) {
        debug!("heading smoother recalibrated (was {:.1}°)", self.smoothed);
        self.smoothed = 0.0;
        self.seeded = false;
    }
}

impl Default for HeadingSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_ALPHA)
    }
}
