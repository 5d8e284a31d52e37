//! Deterministic sensor fixtures for tests and demos.
//!
//! Both scripted sources replay a fixed list of readings on a timer from a
//! worker thread, pushing each one into the session's [`EventSink`].  Nothing
//! is process-wide: every fixture is an ordinary value handed to the session
//! that uses it.
//!
//! An interval of zero delivers the whole script immediately, which is what
//! most tests want.  Repetition is ignored at zero interval so a fixture can
//! never flood the stream.

use std::time::Duration;

use log::debug;

use nav_core::{GeoPoint, HeadingSample, Millis, NoiseRng, PositionFix, WatchOptions, wrap_180};

use crate::{
    EventSink, HeadingSource, PositionSource, SensorError, SensorEvent, SensorKind, SensorResult,
    StopSignal, Subscription,
};

/// Nominal spacing of the timestamps on synthesised fixes (1 Hz GPS).
const SYNTHETIC_FIX_SPACING_MS: u64 = 1_000;

/// How a fixture answers `subscribe`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Availability {
    #[default]
    Granted,
    /// The user refused the permission prompt.
    Denied,
    /// The device has no such sensor.
    Unsupported,
}

impl Availability {
    fn check(self, sensor: SensorKind) -> SensorResult<()> {
        match self {
            Availability::Granted     => Ok(()),
            Availability::Denied      => Err(SensorError::PermissionDenied(sensor)),
            Availability::Unsupported => Err(SensorError::Unsupported(sensor)),
        }
    }
}

/// Replay settings shared by both fixtures.
#[derive(Clone, Copy, Debug)]
struct Replay {
    interval:     Duration,
    repeat:       bool,
    /// Send `Lost(PermissionDenied)` after this many deliveries.
    revoke_after: Option<usize>,
}

impl Default for Replay {
    fn default() -> Self {
        Self {
            interval:     Duration::ZERO,
            repeat:       false,
            revoke_after: None,
        }
    }
}

/// Worker body shared by both fixtures.
fn replay<T, F>(
    sensor: SensorKind,
    items:  Vec<T>,
    replay: Replay,
    sink:   EventSink,
    stop:   StopSignal,
    mut to_event: F,
) where
    F: FnMut(&T) -> SensorEvent,
{
    let repeat = replay.repeat && !replay.interval.is_zero() && !items.is_empty();
    let mut sent = 0usize;
    'replay: loop {
        for item in &items {
            if replay.revoke_after == Some(sent) {
                sink.send(SensorEvent::Lost {
                    sensor,
                    error: SensorError::PermissionDenied(sensor),
                });
                break 'replay;
            }
            if !sink.send(to_event(item)) {
                break 'replay;
            }
            sent += 1;
            if stop.wait(replay.interval) {
                break 'replay;
            }
        }
        if !repeat {
            break;
        }
    }
    debug!("{sensor} fixture finished after {sent} events");
}

// ── ScriptedPositionSource ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
struct PositionJitter {
    seed:       u64,
    position_m: f64,
    accuracy_m: f64,
}

/// Replays a list of [`PositionFix`]es.
#[derive(Clone, Debug)]
pub struct ScriptedPositionSource {
    fixes:        Vec<PositionFix>,
    replay:       Replay,
    availability: Availability,
    jitter:       Option<PositionJitter>,
}

impl ScriptedPositionSource {
    pub fn new(fixes: Vec<PositionFix>) -> Self {
        Self {
            fixes,
            replay:       Replay::default(),
            availability: Availability::Granted,
            jitter:       None,
        }
    }

    /// The same coordinate `count` times (a parked "fake location").
    pub fn fixed(point: GeoPoint, accuracy_m: f64, count: usize) -> Self {
        let fixes = (0..count)
            .map(|i| PositionFix::new(point, accuracy_m, Millis(i as u64 * SYNTHETIC_FIX_SPACING_MS)))
            .collect();
        Self::new(fixes)
    }

    /// `steps` fixes evenly spaced on the straight line from `from` to `to`,
    /// both endpoints included.
    pub fn walk(from: GeoPoint, to: GeoPoint, steps: usize, accuracy_m: f64) -> Self {
        let steps = steps.max(2);
        let last = (steps - 1) as f64;
        let fixes = (0..steps)
            .map(|i| {
                PositionFix::new(
                    from.lerp(to, i as f64 / last),
                    accuracy_m,
                    Millis(i as u64 * SYNTHETIC_FIX_SPACING_MS),
                )
            })
            .collect();
        Self::new(fixes)
    }

    /// Delay between deliveries.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.replay.interval = interval;
        self
    }

    /// Loop the script until cancelled (needs a non-zero interval).
    pub fn repeating(mut self) -> Self {
        self.replay.repeat = true;
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Refuse the permission prompt.
    pub fn denied(self) -> Self {
        self.with_availability(Availability::Denied)
    }

    /// Report no GPS hardware.
    pub fn unsupported(self) -> Self {
        self.with_availability(Availability::Unsupported)
    }

    /// Revoke permission mid-stream, after `count` fixes.
    pub fn revoke_after(mut self, count: usize) -> Self {
        self.replay.revoke_after = Some(count);
        self
    }

    /// Scatter each fix by up to `position_m` metres north and east and
    /// degrade its reported accuracy by up to `accuracy_m`, reproducibly.
    pub fn with_jitter(mut self, seed: u64, position_m: f64, accuracy_m: f64) -> Self {
        self.jitter = Some(PositionJitter { seed, position_m, accuracy_m });
        self
    }
}

impl PositionSource for ScriptedPositionSource {
    fn subscribe(&mut self, options: &WatchOptions, sink: EventSink) -> SensorResult<Subscription> {
        self.availability.check(SensorKind::Position)?;
        debug!(
            "position fixture watching {} fixes (high_accuracy={}, timeout={}ms)",
            self.fixes.len(),
            options.high_accuracy,
            options.timeout_ms
        );

        let fixes = self.fixes.clone();
        let replay_cfg = self.replay;
        let jitter = self.jitter;
        Subscription::spawn(SensorKind::Position, move |stop| {
            let mut noise = jitter.map(|j| NoiseRng::derive(j.seed, 1));
            replay(SensorKind::Position, fixes, replay_cfg, sink, stop, |fix| {
                let fix = match (jitter, noise.as_mut()) {
                    (Some(j), Some(rng)) => {
                        let north = rng.symmetric(j.position_m);
                        let east = rng.symmetric(j.position_m);
                        PositionFix {
                            point:      fix.point.offset_m(north, east),
                            accuracy_m: fix.accuracy_m + rng.up_to(j.accuracy_m),
                            ..*fix
                        }
                    }
                    _ => *fix,
                };
                SensorEvent::Position(fix)
            });
        })
    }
}

// ── ScriptedHeadingSource ─────────────────────────────────────────────────────

/// Replays a list of raw compass headings, stamped at delivery time.
#[derive(Clone, Debug)]
pub struct ScriptedHeadingSource {
    degrees:      Vec<f64>,
    replay:       Replay,
    availability: Availability,
    jitter:       Option<(u64, f64)>,
}

impl ScriptedHeadingSource {
    pub fn new(degrees: Vec<f64>) -> Self {
        Self {
            degrees,
            replay:       Replay::default(),
            availability: Availability::Granted,
            jitter:       None,
        }
    }

    /// One heading, `count` times.
    pub fn constant(degrees: f64, count: usize) -> Self {
        Self::new(vec![degrees; count])
    }

    /// `steps` headings turning from `from` to `to` along the shorter arc.
    pub fn sweep(from: f64, to: f64, steps: usize) -> Self {
        let steps = steps.max(2);
        let arc = wrap_180(to - from);
        let last = (steps - 1) as f64;
        Self::new((0..steps).map(|i| from + arc * i as f64 / last).collect())
    }

    /// A device without a compass.
    pub fn unsupported() -> Self {
        Self::new(Vec::new()).with_availability(Availability::Unsupported)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.replay.interval = interval;
        self
    }

    pub fn repeating(mut self) -> Self {
        self.replay.repeat = true;
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn denied(self) -> Self {
        self.with_availability(Availability::Denied)
    }

    pub fn revoke_after(mut self, count: usize) -> Self {
        self.replay.revoke_after = Some(count);
        self
    }

    /// Add up to ±`amplitude_deg` of reproducible noise to every sample.
    pub fn with_jitter(mut self, seed: u64, amplitude_deg: f64) -> Self {
        self.jitter = Some((seed, amplitude_deg));
        self
    }
}

impl HeadingSource for ScriptedHeadingSource {
    fn subscribe(&mut self, sink: EventSink) -> SensorResult<Subscription> {
        self.availability.check(SensorKind::Heading)?;

        let degrees = self.degrees.clone();
        let replay_cfg = self.replay;
        let jitter = self.jitter;
        Subscription::spawn(SensorKind::Heading, move |stop| {
            let mut noise = jitter.map(|(seed, _)| NoiseRng::derive(seed, 2));
            replay(SensorKind::Heading, degrees, replay_cfg, sink, stop, |&deg| {
                let offset = match (jitter, noise.as_mut()) {
                    (Some((_, amplitude)), Some(rng)) => rng.symmetric(amplitude),
                    _ => 0.0,
                };
                SensorEvent::Heading(HeadingSample::new(deg + offset, Millis::now()))
            });
        })
    }
}
