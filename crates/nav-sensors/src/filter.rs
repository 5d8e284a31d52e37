//! Accuracy gate for position fixes.
//!
//! A single bad fix (a reflection off a building, indoor multipath) can put
//! the user tens of metres away and flip the arrow.  Holding the last good
//! fix is better than acting on a degraded one, so fixes whose reported
//! uncertainty exceeds the limit are dropped outright.  Dropping is not an
//! error: the caller gets a [`Rejected`] for diagnostics and carries on.

use std::fmt;

use log::debug;

use nav_core::PositionFix;
use nav_core::config::DEFAULT_MAX_ACCURACY_M;

/// Why a fix was dropped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RejectReason {
    /// Reported accuracy worse than the limit (or not a number).
    Inaccurate { accuracy_m: f64, limit_m: f64 },
    /// Coordinates are NaN, infinite, or out of range.
    InvalidCoordinates,
}

/// A dropped fix and the reason it was dropped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rejected {
    pub fix:    PositionFix,
    pub reason: RejectReason,
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            RejectReason::Inaccurate { accuracy_m, limit_m } => write!(
                f,
                "fix at {} rejected: accuracy {accuracy_m:.1} m exceeds {limit_m:.1} m",
                self.fix.point
            ),
            RejectReason::InvalidCoordinates => {
                write!(f, "fix at {} rejected: invalid coordinates", self.fix.point)
            }
        }
    }
}

/// Running counts, for diagnostics overlays.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub accepted: u64,
    pub rejected: u64,
}

/// Drops fixes whose `accuracy_m` exceeds `max_accuracy_m`.
#[derive(Clone, Debug)]
pub struct AccuracyFilter {
    max_accuracy_m: f64,
    stats:          FilterStats,
}

impl AccuracyFilter {
    pub fn new(max_accuracy_m: f64) -> Self {
        Self {
            max_accuracy_m,
            stats: FilterStats::default(),
        }
    }

    /// Pass `fix` through, or explain why it was dropped.
    pub fn accept(&mut self, fix: PositionFix) -> Result<PositionFix, Rejected> {
        let reason = if !fix.point.is_valid() {
            Some(RejectReason::InvalidCoordinates)
        } else if !(fix.accuracy_m >= 0.0 && fix.accuracy_m <= self.max_accuracy_m) {
            Some(RejectReason::Inaccurate {
                accuracy_m: fix.accuracy_m,
                limit_m:    self.max_accuracy_m,
            })
        } else {
            None
        };

        match reason {
            None => {
                self.stats.accepted += 1;
                Ok(fix)
            }
            Some(reason) => {
                self.stats.rejected += 1;
                let rejected = Rejected { fix, reason };
                debug!("{rejected}");
                Err(rejected)
            }
        }
    }

    #[inline]
    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = FilterStats::default();
    }
}

impl Default for AccuracyFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ACCURACY_M)
    }
}
