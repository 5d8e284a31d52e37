//! The navigation session: subscriptions, event handling, and lifecycle.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use nav_core::{Destination, HeadingReading, NavConfig, NavigationState, PositionFix};
use nav_guidance::GuidanceStateMachine;
use nav_sensors::{
    AccuracyFilter, EventSink, FilterStats, HeadingSmoother, HeadingSource, PositionSource,
    SensorError, SensorEvent, SensorKind,
};

use crate::{
    ErrorReason, LatestState, NavigationObserver, PlatformResource, SessionError, SessionPhase,
    SessionResources, SessionResult, StateCallback,
};

/// One navigation toward one destination at a time.
///
/// Build with [`SessionBuilder`][crate::SessionBuilder] or
/// [`NavigationSession::new`], call [`start`][Self::start], then drive it
/// with [`run`][Self::run], [`run_for`][Self::run_for], or
/// [`pump`][Self::pump].
pub struct NavigationSession<P: PositionSource, H: HeadingSource> {
    config:            NavConfig,
    position_source:   P,
    heading_source:    H,

    // ── Pipeline (touched only from the driving thread) ──────────────────
    filter:            AccuracyFilter,
    smoother:          HeadingSmoother,
    guidance:          GuidanceStateMachine,
    destination:       Option<Destination>,
    last_fix:          Option<PositionFix>,
    heading_available: bool,

    // ── Lifecycle ─────────────────────────────────────────────────────────
    phase:             SessionPhase,
    events:            Option<Receiver<SensorEvent>>,
    /// Error that ended tracking mid-stream, until a driver reports it.
    failure:           Option<SessionError>,
    resources:         SessionResources,
    /// Platform resources not currently acquired.
    platform:          Vec<Box<dyn PlatformResource>>,

    // ── Output ────────────────────────────────────────────────────────────
    observers:         Vec<Box<dyn NavigationObserver>>,
    latest:            LatestState,
}

impl<P: PositionSource, H: HeadingSource> NavigationSession<P, H> {
    /// A session with no observers or platform resources.  `config` is
    /// validated.
    pub fn new(config: NavConfig, position_source: P, heading_source: H) -> SessionResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, position_source, heading_source, LatestState::new()))
    }

    pub(crate) fn from_parts(
        config:          NavConfig,
        position_source: P,
        heading_source:  H,
        latest:          LatestState,
    ) -> Self {
        Self {
            filter:            AccuracyFilter::new(config.max_accuracy_m),
            smoother:          HeadingSmoother::new(config.smoothing_alpha),
            guidance:          GuidanceStateMachine::new(&config),
            destination:       None,
            last_fix:          None,
            heading_available: true,
            phase:             SessionPhase::Idle,
            events:            None,
            failure:           None,
            resources:         SessionResources::new(),
            platform:          Vec::new(),
            observers:         Vec::new(),
            config,
            position_source,
            heading_source,
            latest,
        }
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register a state callback.  Every registered callback is invoked on
    /// every emitted state, in registration order.
    pub fn on_state_change<F>(&mut self, callback: F)
    where
        F: FnMut(&NavigationState) + Send + 'static,
    {
        self.observers.push(Box::new(StateCallback(callback)));
    }

    pub fn observe(&mut self, observer: Box<dyn NavigationObserver>) {
        self.observers.push(observer);
    }

    /// Add a resource to acquire on the next `start`.
    pub fn add_resource(&mut self, resource: Box<dyn PlatformResource>) {
        self.platform.push(resource);
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Begin navigating to `destination`.
    ///
    /// Allowed from `Idle` or `Arrived`.  Subscribes to both sources and
    /// acquires every platform resource; any fatal failure releases whatever
    /// was already acquired and leaves the session in `Error`.
    pub fn start(&mut self, destination: Destination) -> SessionResult<()> {
        match self.phase {
            SessionPhase::Idle | SessionPhase::Arrived => {}
            SessionPhase::Error(reason) => return Err(SessionError::Failed(reason)),
            phase => return Err(SessionError::AlreadyActive(phase)),
        }

        if !destination.is_valid() {
            warn!("rejecting destination {destination}");
            self.transition(SessionPhase::Error(ErrorReason::DestinationInvalid));
            return Err(SessionError::DestinationInvalid(destination.to_string()));
        }

        self.reset_pipeline();
        info!("navigating to {destination}");
        self.destination = Some(destination);
        self.transition(SessionPhase::Initializing);

        // The session keeps no sender: the stream disconnects once every
        // source has finished.
        let (tx, rx) = mpsc::channel();

        let watch = self.config.watch;
        match self.position_source.subscribe(&watch, EventSink::new(tx.clone())) {
            Ok(sub) => self.resources.add_subscription(sub),
            Err(e) => return Err(self.fail(e)),
        }

        match self.heading_source.subscribe(EventSink::new(tx)) {
            Ok(sub) => self.resources.add_subscription(sub),
            Err(e) if e.is_unsupported() => self.degrade_heading(&e),
            Err(e) => return Err(self.fail(e)),
        }

        let mut pending = std::mem::take(&mut self.platform).into_iter();
        while let Some(resource) = pending.next() {
            if let Err((resource, e)) = self.resources.acquire(resource) {
                self.platform.push(resource);
                self.platform.extend(pending);
                return Err(self.fail(e));
            }
        }

        self.events = Some(rx);
        self.transition(SessionPhase::Tracking);
        Ok(())
    }

    /// Release every subscription and resource.  A live session returns to
    /// `Idle`; terminal phases are kept.  Always succeeds; safe to repeat.
    pub fn stop(&mut self) {
        self.release();
        if self.phase.is_active() {
            self.transition(SessionPhase::Idle);
        }
    }

    /// Reset the heading smoother.  The next compass sample re-seeds it.
    pub fn recalibrate_heading(&mut self) -> SessionResult<()> {
        if self.phase != SessionPhase::Tracking {
            return Err(SessionError::NotTracking(self.phase));
        }
        self.smoother.recalibrate();
        Ok(())
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Block on the sensor stream until the session leaves `Tracking` or
    /// every source has finished.  Returns the phase at exit, or the error
    /// that moved the session to `Error`.
    pub fn run(&mut self) -> SessionResult<SessionPhase> {
        self.ensure_tracking()?;
        while self.phase == SessionPhase::Tracking {
            let Some(events) = self.events.as_ref() else { break };
            match events.recv() {
                Ok(event) => self.handle_event(event),
                Err(_) => {
                    debug!("all sensor streams ended");
                    break;
                }
            }
        }
        self.finish_run()
    }

    /// Like [`run`][Self::run], but returns after at most `limit`.
    pub fn run_for(&mut self, limit: Duration) -> SessionResult<SessionPhase> {
        self.ensure_tracking()?;
        let deadline = Instant::now() + limit;
        while self.phase == SessionPhase::Tracking {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            let Some(events) = self.events.as_ref() else { break };
            match events.recv_timeout(remaining) {
                Ok(event) => self.handle_event(event),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("all sensor streams ended");
                    break;
                }
            }
        }
        self.finish_run()
    }

    /// Handle every event already queued, without blocking.  Returns how
    /// many events were handled; a stream failure is left for
    /// [`take_failure`][Self::take_failure].
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while self.phase == SessionPhase::Tracking {
            let Some(events) = self.events.as_ref() else { break };
            match events.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        handled
    }

    /// Process one sensor event.  Ignored unless the session is `Tracking`.
    ///
    /// Host event loops that receive platform callbacks directly can call
    /// this instead of routing them through a source.
    pub fn handle_event(&mut self, event: SensorEvent) {
        if self.phase != SessionPhase::Tracking {
            return;
        }
        match event {
            SensorEvent::Position(fix) => match self.filter.accept(fix) {
                Ok(fix) => {
                    self.last_fix = Some(fix);
                    self.refresh();
                }
                Err(rejected) => {
                    for observer in &mut self.observers {
                        observer.on_fix_rejected(&rejected);
                    }
                }
            },
            SensorEvent::Heading(sample) => {
                if self.heading_available {
                    self.smoother.update(&sample);
                    self.refresh();
                }
            }
            SensorEvent::Lost { sensor: SensorKind::Heading, error } if error.is_unsupported() => {
                self.degrade_heading(&error);
                self.refresh();
            }
            SensorEvent::Lost { sensor, error } => {
                warn!("{sensor} stream lost: {error}");
                let failure = self.fail(error);
                self.failure = Some(failure);
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// The last emitted state.
    pub fn state(&self) -> Option<&NavigationState> {
        self.guidance.last()
    }

    /// A handle renderers can poll from any thread.
    pub fn latest_state(&self) -> LatestState {
        self.latest.clone()
    }

    pub fn filter_stats(&self) -> FilterStats {
        self.filter.stats()
    }

    pub fn heading_available(&self) -> bool {
        self.heading_available
    }

    /// The error that ended tracking from a sensor stream, if `run` has not
    /// already returned it.
    pub fn take_failure(&mut self) -> Option<SessionError> {
        self.failure.take()
    }

    /// Subscriptions and platform resources currently held.
    pub fn held_resources(&self) -> usize {
        self.resources.subscription_count() + self.resources.held_count()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn ensure_tracking(&self) -> SessionResult<()> {
        if self.phase == SessionPhase::Tracking {
            Ok(())
        } else {
            Err(SessionError::NotTracking(self.phase))
        }
    }

    fn finish_run(&mut self) -> SessionResult<SessionPhase> {
        match self.failure.take() {
            Some(error) => Err(error),
            None => Ok(self.phase),
        }
    }

    fn reset_pipeline(&mut self) {
        self.filter = AccuracyFilter::new(self.config.max_accuracy_m);
        self.smoother = HeadingSmoother::new(self.config.smoothing_alpha);
        self.guidance.reset();
        self.last_fix = None;
        self.heading_available = true;
        self.failure = None;
        self.latest.clear();
    }

    fn degrade_heading(&mut self, error: &SensorError) {
        warn!("{error}; continuing with distance-only guidance");
        self.heading_available = false;
    }

    /// Recompute guidance from the newest inputs and emit the result.
    fn refresh(&mut self) {
        let Some(fix) = self.last_fix else { return };
        let heading = if self.heading_available {
            HeadingReading::Available(self.smoother.value())
        } else {
            HeadingReading::Unavailable
        };
        let Some(state) = self.guidance.update(
            Some(fix.point),
            heading,
            self.destination.as_ref(),
            fix.accuracy_m,
        ) else {
            return;
        };

        self.latest.set(state.clone());
        for observer in &mut self.observers {
            observer.on_state(&state);
        }

        if state.arrived {
            self.release();
            self.transition(SessionPhase::Arrived);
        }
    }

    /// Enter `Error` with every resource released; returns the error to
    /// hand back to the caller.
    fn fail(&mut self, error: SensorError) -> SessionError {
        let reason = ErrorReason::from(&error);
        warn!("session failed: {error}");
        self.release();
        self.transition(SessionPhase::Error(reason));
        SessionError::from(error)
    }

    fn release(&mut self) {
        self.events = None;
        let released = self.resources.release_all();
        self.platform.extend(released);
    }

    fn transition(&mut self, to: SessionPhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        info!("session {from} -> {to}");
        for observer in &mut self.observers {
            observer.on_phase(from, to);
        }
    }
}

impl<P: PositionSource, H: HeadingSource> Drop for NavigationSession<P, H> {
    fn drop(&mut self) {
        self.release();
    }
}
