//! Unit tests for nav-session.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use nav_core::{Destination, GeoPoint, Millis, NavConfig, NavigationState, PositionFix, TurnDirection};
use nav_sensors::{
    RejectReason, Rejected, ScriptedHeadingSource, ScriptedPositionSource, SensorError,
    SensorEvent, SensorKind, SensorResult,
};

use crate::{
    ErrorReason, FrameLoop, LatestState, NavigationObserver, NavigationSession,
    PlatformResource, SessionBuilder, SessionError, SessionPhase,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

type Session = NavigationSession<ScriptedPositionSource, ScriptedHeadingSource>;

fn campus_start() -> GeoPoint {
    GeoPoint::new(12.9230, 77.5010)
}

fn library() -> Destination {
    Destination::new(12.9240, 77.4995, "Library")
}

fn fix_at(point: GeoPoint, accuracy_m: f64) -> PositionFix {
    PositionFix::new(point, accuracy_m, Millis(0))
}

/// Sources that grant access but never deliver; tests push events by hand.
fn silent() -> Session {
    SessionBuilder::new(ScriptedPositionSource::new(Vec::new()), ScriptedHeadingSource::new(Vec::new()))
        .build()
        .unwrap()
}

#[derive(Clone, Default)]
struct Recorder {
    states:   Arc<Mutex<Vec<NavigationState>>>,
    phases:   Arc<Mutex<Vec<(SessionPhase, SessionPhase)>>>,
    rejected: Arc<Mutex<Vec<RejectReason>>>,
}

impl Recorder {
    fn states(&self) -> Vec<NavigationState> {
        self.states.lock().unwrap().clone()
    }

    fn phases(&self) -> Vec<(SessionPhase, SessionPhase)> {
        self.phases.lock().unwrap().clone()
    }

    fn rejected(&self) -> Vec<RejectReason> {
        self.rejected.lock().unwrap().clone()
    }
}

impl NavigationObserver for Recorder {
    fn on_state(&mut self, state: &NavigationState) {
        self.states.lock().unwrap().push(state.clone());
    }

    fn on_phase(&mut self, from: SessionPhase, to: SessionPhase) {
        self.phases.lock().unwrap().push((from, to));
    }

    fn on_fix_rejected(&mut self, rejected: &Rejected) {
        self.rejected.lock().unwrap().push(rejected.reason);
    }
}

/// Counts acquire/release calls; optionally refuses to be acquired.
#[derive(Clone, Default)]
struct CountingResource {
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    refuse:   bool,
}

impl PlatformResource for CountingResource {
    fn kind(&self) -> SensorKind {
        SensorKind::Camera
    }

    fn acquire(&mut self) -> SensorResult<()> {
        if self.refuse {
            return Err(SensorError::PermissionDenied(SensorKind::Camera));
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    false
}

// ── End-to-end ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod end_to_end {
    use super::*;

    fn walking_session(rec: &Recorder) -> Session {
        SessionBuilder::new(
            ScriptedPositionSource::walk(campus_start(), library().point, 21, 5.0),
            ScriptedHeadingSource::constant(0.0, 1),
        )
        .observer(rec.clone())
        .build()
        .unwrap()
    }

    #[test]
    fn walk_to_the_library_arrives_once() {
        let rec = Recorder::default();
        let mut session = walking_session(&rec);
        session.start(library()).unwrap();
        assert_eq!(session.run().unwrap(), SessionPhase::Arrived);

        let states = rec.states();
        assert!(states.len() >= 2);
        assert_eq!(states.iter().filter(|s| s.arrived).count(), 1);
        assert!(states.last().unwrap().arrived);
        assert_eq!(session.held_resources(), 0);
    }

    #[test]
    fn first_state_comes_from_the_first_bearing() {
        let rec = Recorder::default();
        let mut session = walking_session(&rec);
        session.start(library()).unwrap();
        session.run().unwrap();

        let first = &rec.states()[0];
        assert!(first.distance_m > 150.0);
        assert!(!first.arrived);
        // Facing north, the library is to the north-west.
        assert_eq!(first.turn_direction, TurnDirection::Left);
        assert_eq!(first.eta_label, "3 min");
    }

    #[test]
    fn distance_never_increases() {
        let rec = Recorder::default();
        let mut session = walking_session(&rec);
        session.start(library()).unwrap();
        session.run().unwrap();

        let distances: Vec<f64> = rec.states().iter().map(|s| s.distance_m).collect();
        assert!(distances.windows(2).all(|w| w[1] <= w[0] + 1e-9), "{distances:?}");
    }

    #[test]
    fn lifecycle_events_in_order() {
        let rec = Recorder::default();
        let mut session = walking_session(&rec);
        session.start(library()).unwrap();
        session.run().unwrap();

        assert_eq!(
            rec.phases(),
            vec![
                (SessionPhase::Idle, SessionPhase::Initializing),
                (SessionPhase::Initializing, SessionPhase::Tracking),
                (SessionPhase::Tracking, SessionPhase::Arrived),
            ]
        );
    }

    #[test]
    fn events_after_arrival_are_ignored() {
        let rec = Recorder::default();
        let mut session = walking_session(&rec);
        session.start(library()).unwrap();
        session.run().unwrap();
        let before = rec.states().len();

        session.handle_event(SensorEvent::Position(fix_at(campus_start(), 5.0)));
        assert_eq!(rec.states().len(), before);
        assert_eq!(session.phase(), SessionPhase::Arrived);
    }

    #[test]
    fn latest_state_tracks_emissions() {
        let mut session = silent();
        let latest = session.latest_state();
        session.start(library()).unwrap();
        assert!(latest.is_empty());

        session.handle_event(SensorEvent::Position(fix_at(campus_start(), 5.0)));
        assert_eq!(latest.get().as_ref(), session.state());
    }
}

// ── Event handling ────────────────────────────────────────────────────────────

#[cfg(test)]
mod events {
    use super::*;
    use nav_core::HeadingSample;

    #[test]
    fn inaccurate_fix_leaves_state_unchanged() {
        let rec = Recorder::default();
        let mut session = silent();
        session.observe(Box::new(rec.clone()));
        session.start(library()).unwrap();

        session.handle_event(SensorEvent::Position(fix_at(campus_start(), 5.0)));
        let before = session.state().cloned();

        let far = GeoPoint::new(12.95, 77.55);
        session.handle_event(SensorEvent::Position(fix_at(far, 80.0)));

        assert_eq!(session.state().cloned(), before);
        assert_eq!(rec.states().len(), 1);
        assert_eq!(
            rec.rejected(),
            vec![RejectReason::Inaccurate { accuracy_m: 80.0, limit_m: 50.0 }]
        );
        let stats = session.filter_stats();
        assert_eq!((stats.accepted, stats.rejected), (1, 1));
    }

    #[test]
    fn heading_before_position_emits_nothing() {
        let rec = Recorder::default();
        let mut session = silent();
        session.observe(Box::new(rec.clone()));
        session.start(library()).unwrap();

        session.handle_event(SensorEvent::Heading(HeadingSample::new(90.0, Millis(0))));
        assert!(rec.states().is_empty());
        assert!(session.state().is_none());
    }

    #[test]
    fn heading_updates_emit_new_states() {
        let rec = Recorder::default();
        let mut session = silent();
        session.observe(Box::new(rec.clone()));
        session.start(library()).unwrap();

        session.handle_event(SensorEvent::Position(fix_at(campus_start(), 5.0)));
        let bearing = rec.states()[0].bearing_deg;
        session.handle_event(SensorEvent::Heading(HeadingSample::new(bearing, Millis(1))));

        let states = rec.states();
        assert_eq!(states.len(), 2);
        // The first sample seeds the smoother, so the user now faces the target.
        assert_eq!(states[1].relative_bearing_deg, 0.0);
        assert!(states[1].is_on_track);
    }

    #[test]
    fn multiple_callbacks_all_fire() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let mut session = silent();
        let (ca, cb) = (Arc::clone(&a), Arc::clone(&b));
        session.on_state_change(move |_| {
            ca.fetch_add(1, Ordering::SeqCst);
        });
        session.on_state_change(move |_| {
            cb.fetch_add(1, Ordering::SeqCst);
        });
        session.start(library()).unwrap();

        for _ in 0..3 {
            session.handle_event(SensorEvent::Position(fix_at(campus_start(), 5.0)));
        }
        assert_eq!(a.load(Ordering::SeqCst), 3);
        assert_eq!(b.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn compass_loss_degrades_instead_of_failing() {
        let rec = Recorder::default();
        let mut session = silent();
        session.observe(Box::new(rec.clone()));
        session.start(library()).unwrap();
        session.handle_event(SensorEvent::Position(fix_at(campus_start(), 5.0)));

        session.handle_event(SensorEvent::Lost {
            sensor: SensorKind::Heading,
            error:  SensorError::Unsupported(SensorKind::Heading),
        });

        assert_eq!(session.phase(), SessionPhase::Tracking);
        assert!(!session.heading_available());
        assert!(!rec.states().last().unwrap().heading_available);
    }

    #[test]
    fn revoked_permission_ends_the_session() {
        let rec = Recorder::default();
        let mut session = SessionBuilder::new(
            ScriptedPositionSource::fixed(campus_start(), 5.0, 3).revoke_after(1),
            ScriptedHeadingSource::new(Vec::new()),
        )
        .observer(rec.clone())
        .build()
        .unwrap();
        session.start(library()).unwrap();

        let err = session.run().unwrap_err();
        assert!(matches!(err, SessionError::PermissionDenied(SensorKind::Position)), "{err}");
        assert_eq!(session.phase(), SessionPhase::Error(ErrorReason::PermissionDenied));
        assert_eq!(rec.states().len(), 1);
        assert_eq!(session.held_resources(), 0);
        // Reported once.
        assert!(session.take_failure().is_none());
    }

    #[test]
    fn lost_stream_failure_is_kept_for_the_host() {
        let mut session = silent();
        session.start(library()).unwrap();
        assert!(session.take_failure().is_none());

        session.handle_event(SensorEvent::Lost {
            sensor: SensorKind::Position,
            error:  SensorError::Unsupported(SensorKind::Position),
        });
        assert_eq!(session.phase(), SessionPhase::Error(ErrorReason::SensorUnsupported));
        assert!(matches!(
            session.take_failure(),
            Some(SessionError::SensorUnsupported(SensorKind::Position))
        ));
        assert!(session.take_failure().is_none());
    }

    #[test]
    fn pump_drains_without_blocking() {
        let rec = Recorder::default();
        let mut session = SessionBuilder::new(
            ScriptedPositionSource::fixed(campus_start(), 5.0, 3),
            ScriptedHeadingSource::new(Vec::new()),
        )
        .observer(rec.clone())
        .build()
        .unwrap();
        session.start(library()).unwrap();

        assert!(wait_until(|| {
            session.pump();
            rec.states().len() == 3
        }));
        assert_eq!(session.pump(), 0);
    }

    #[test]
    fn run_for_returns_while_still_tracking() {
        let mut session = SessionBuilder::new(
            ScriptedPositionSource::fixed(campus_start(), 5.0, 2)
                .with_interval(Duration::from_millis(5))
                .repeating(),
            ScriptedHeadingSource::constant(0.0, 2)
                .with_interval(Duration::from_millis(5))
                .repeating(),
        )
        .build()
        .unwrap();
        session.start(library()).unwrap();

        let phase = session.run_for(Duration::from_millis(40)).unwrap();
        assert_eq!(phase, SessionPhase::Tracking);
        assert!(session.state().is_some());
        session.stop();
        assert_eq!(session.held_resources(), 0);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn invalid_destination_fails_fast() {
        let mut session = silent();
        let err = session.start(Destination::new(f64::NAN, 77.5, "Nowhere")).unwrap_err();
        assert!(matches!(err, SessionError::DestinationInvalid(_)));
        assert_eq!(session.phase(), SessionPhase::Error(ErrorReason::DestinationInvalid));
        assert_eq!(session.held_resources(), 0);
    }

    #[test]
    fn position_denial_is_terminal() {
        let mut session: Session = SessionBuilder::new(
            ScriptedPositionSource::fixed(campus_start(), 5.0, 1).denied(),
            ScriptedHeadingSource::constant(0.0, 1),
        )
        .build()
        .unwrap();

        let err = session.start(library()).unwrap_err();
        assert!(matches!(err, SessionError::PermissionDenied(SensorKind::Position)));
        assert_eq!(session.phase(), SessionPhase::Error(ErrorReason::PermissionDenied));

        let again = session.start(library()).unwrap_err();
        assert!(matches!(again, SessionError::Failed(ErrorReason::PermissionDenied)));
    }

    #[test]
    fn heading_denial_releases_the_position_watch() {
        let mut session = SessionBuilder::new(
            ScriptedPositionSource::fixed(campus_start(), 5.0, 1)
                .with_interval(Duration::from_millis(10))
                .repeating(),
            ScriptedHeadingSource::constant(0.0, 1).denied(),
        )
        .build()
        .unwrap();

        let err = session.start(library()).unwrap_err();
        assert_eq!(err.reason(), Some(ErrorReason::PermissionDenied));
        assert_eq!(session.held_resources(), 0);
    }

    #[test]
    fn unsupported_compass_still_tracks() {
        let rec = Recorder::default();
        let mut session = SessionBuilder::new(
            ScriptedPositionSource::fixed(campus_start(), 5.0, 2),
            ScriptedHeadingSource::unsupported(),
        )
        .observer(rec.clone())
        .build()
        .unwrap();

        session.start(library()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Tracking);
        assert!(!session.heading_available());
        session.run().unwrap();

        let states = rec.states();
        assert_eq!(states.len(), 2);
        assert!(states.iter().all(|s| !s.heading_available));
    }

    #[test]
    fn second_start_is_rejected() {
        let mut session = silent();
        session.start(library()).unwrap();
        let err = session.start(library()).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyActive(SessionPhase::Tracking)));
    }

    #[test]
    fn stop_is_idempotent_and_allows_restart() {
        let mut session = silent();
        session.stop();
        assert_eq!(session.phase(), SessionPhase::Idle);

        session.start(library()).unwrap();
        session.stop();
        session.stop();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.held_resources(), 0);

        session.start(library()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Tracking);
    }

    #[test]
    fn stop_keeps_terminal_phases() {
        let mut session = silent();
        let _ = session.start(Destination::new(91.0, 0.0, "Off the map"));
        session.stop();
        assert_eq!(session.phase(), SessionPhase::Error(ErrorReason::DestinationInvalid));
    }

    #[test]
    fn recalibrate_needs_tracking() {
        let mut session = silent();
        assert!(matches!(
            session.recalibrate_heading(),
            Err(SessionError::NotTracking(SessionPhase::Idle))
        ));
        session.start(library()).unwrap();
        assert!(session.recalibrate_heading().is_ok());
    }

    #[test]
    fn recalibrate_reseeds_from_the_next_sample() {
        use nav_core::HeadingSample;

        let rec = Recorder::default();
        let mut session = silent();
        session.observe(Box::new(rec.clone()));
        session.start(library()).unwrap();
        session.handle_event(SensorEvent::Position(fix_at(campus_start(), 5.0)));
        let bearing = rec.states()[0].bearing_deg;

        // Seed a quarter turn off, then pull towards the target: the blend
        // only covers part of the gap.
        session.handle_event(SensorEvent::Heading(HeadingSample::new((bearing + 90.0) % 360.0, Millis(1))));
        session.handle_event(SensorEvent::Heading(HeadingSample::new(bearing, Millis(2))));
        let blended = rec.states().last().unwrap().relative_bearing_deg;
        assert!((blended - 297.0).abs() < 1e-6, "blended relative {blended}");

        session.recalibrate_heading().unwrap();
        session.handle_event(SensorEvent::Heading(HeadingSample::new(bearing, Millis(3))));
        let state = rec.states().last().unwrap().clone();
        assert!(state.relative_bearing_deg.abs() < 1e-9 || (360.0 - state.relative_bearing_deg) < 1e-9);
        assert!(state.is_on_track);
    }

    #[test]
    fn run_needs_tracking() {
        let mut session = silent();
        assert!(matches!(session.run(), Err(SessionError::NotTracking(SessionPhase::Idle))));
    }

    #[test]
    fn restart_after_arrival() {
        let mut session = silent();
        session.start(library()).unwrap();
        session.handle_event(SensorEvent::Position(fix_at(library().point, 5.0)));
        assert_eq!(session.phase(), SessionPhase::Arrived);

        session.start(Destination::new(12.9250, 77.5000, "Canteen")).unwrap();
        assert_eq!(session.phase(), SessionPhase::Tracking);
        assert!(session.state().is_none());
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = NavConfig { smoothing_alpha: 0.0, ..NavConfig::default() };
        let result = SessionBuilder::new(
            ScriptedPositionSource::new(Vec::new()),
            ScriptedHeadingSource::new(Vec::new()),
        )
        .config(config)
        .build();
        assert!(matches!(result, Err(SessionError::Config(_))));
    }
}

// ── Resources ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod resources {
    use super::*;

    #[test]
    fn acquired_on_start_released_on_stop() {
        let resource = CountingResource::default();
        let mut session = SessionBuilder::new(
            ScriptedPositionSource::new(Vec::new()),
            ScriptedHeadingSource::new(Vec::new()),
        )
        .resource(resource.clone())
        .build()
        .unwrap();

        session.start(library()).unwrap();
        assert_eq!(resource.acquired.load(Ordering::SeqCst), 1);
        session.stop();
        session.stop();
        assert_eq!(resource.released.load(Ordering::SeqCst), 1);

        // The resource is reusable by the next start.
        session.start(library()).unwrap();
        assert_eq!(resource.acquired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn released_on_arrival() {
        let resource = CountingResource::default();
        let mut session = SessionBuilder::new(
            ScriptedPositionSource::new(Vec::new()),
            ScriptedHeadingSource::new(Vec::new()),
        )
        .resource(resource.clone())
        .build()
        .unwrap();

        session.start(library()).unwrap();
        session.handle_event(SensorEvent::Position(fix_at(library().point, 5.0)));
        assert_eq!(session.phase(), SessionPhase::Arrived);
        assert_eq!(resource.released.load(Ordering::SeqCst), 1);
        assert_eq!(session.held_resources(), 0);
    }

    #[test]
    fn failed_acquire_releases_everything_already_held() {
        let good = CountingResource::default();
        let bad = CountingResource { refuse: true, ..CountingResource::default() };
        let mut session = SessionBuilder::new(
            ScriptedPositionSource::fixed(campus_start(), 5.0, 1)
                .with_interval(Duration::from_millis(10))
                .repeating(),
            ScriptedHeadingSource::constant(0.0, 1),
        )
        .resource(good.clone())
        .resource(bad.clone())
        .build()
        .unwrap();

        let err = session.start(library()).unwrap_err();
        assert!(matches!(err, SessionError::PermissionDenied(SensorKind::Camera)));
        assert_eq!(session.phase(), SessionPhase::Error(ErrorReason::PermissionDenied));
        assert_eq!(good.acquired.load(Ordering::SeqCst), 1);
        assert_eq!(good.released.load(Ordering::SeqCst), 1);
        assert_eq!(bad.released.load(Ordering::SeqCst), 0);
        assert_eq!(session.held_resources(), 0);
    }

    #[test]
    fn released_on_drop() {
        let resource = CountingResource::default();
        {
            let mut session = SessionBuilder::new(
                ScriptedPositionSource::new(Vec::new()),
                ScriptedHeadingSource::new(Vec::new()),
            )
            .resource(resource.clone())
            .build()
            .unwrap();
            session.start(library()).unwrap();
        }
        assert_eq!(resource.released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn frame_loop_redraws_latest_state() {
        let drawn = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&drawn);
        let config = NavConfig { frame_interval_ms: 1, ..NavConfig::default() };
        let mut session = SessionBuilder::new(
            ScriptedPositionSource::new(Vec::new()),
            ScriptedHeadingSource::new(Vec::new()),
        )
        .config(config)
        .frame_loop(move |state| {
            assert!(state.distance_m > 0.0);
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

        session.start(library()).unwrap();
        // Nothing to draw until a state exists.
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(drawn.load(Ordering::SeqCst), 0);

        session.handle_event(SensorEvent::Position(fix_at(campus_start(), 5.0)));
        assert!(wait_until(|| drawn.load(Ordering::SeqCst) >= 3));

        session.stop();
        let after_stop = drawn.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(drawn.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn frame_loop_runs_between_acquire_and_release() {
        let mut frames = FrameLoop::new(LatestState::new(), Duration::from_millis(1), |_| {});
        assert!(!frames.is_running());
        assert_eq!(frames.kind(), SensorKind::Display);

        frames.acquire().unwrap();
        assert!(frames.is_running());
        // A second acquire keeps the one worker.
        frames.acquire().unwrap();
        assert!(frames.is_running());

        frames.release();
        assert!(!frames.is_running());
        frames.release();
        assert!(!frames.is_running());
    }
}

// ── Error mapping ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use super::*;

    #[test]
    fn sensor_errors_map_to_reasons() {
        let denied = SensorError::PermissionDenied(SensorKind::Heading);
        let missing = SensorError::Unsupported(SensorKind::Camera);
        assert_eq!(ErrorReason::from(&denied), ErrorReason::PermissionDenied);
        assert_eq!(ErrorReason::from(&missing), ErrorReason::SensorUnsupported);

        assert!(matches!(
            SessionError::from(missing),
            SessionError::SensorUnsupported(SensorKind::Camera)
        ));
    }

    #[test]
    fn phases_display() {
        assert_eq!(SessionPhase::Tracking.to_string(), "tracking");
        assert_eq!(
            SessionPhase::Error(ErrorReason::SensorUnsupported).to_string(),
            "error(sensor_unsupported)"
        );
    }
}
