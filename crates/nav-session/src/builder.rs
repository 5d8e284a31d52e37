//! Fluent builder for constructing a [`NavigationSession`].

use std::time::Duration;

use nav_core::{NavConfig, NavigationState};
use nav_sensors::{HeadingSource, PositionSource};

use crate::{
    FrameLoop, LatestState, NavigationObserver, NavigationSession, PlatformResource,
    SessionResult, StateCallback,
};

type DrawFn = Box<dyn FnMut(&NavigationState) + Send>;

/// Fluent builder for [`NavigationSession<P, H>`].
///
/// # Required inputs
///
/// - `P: PositionSource` — live GPS provider or a scripted fixture
/// - `H: HeadingSource` — live compass provider or a scripted fixture
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                      |
/// |--------------------------|------------------------------|
/// | `.config(c)`             | `NavConfig::default()`       |
/// | `.resource(r)`           | no platform resources        |
/// | `.frame_loop(f)`         | no redraw loop               |
/// | `.observer(o)`           | no observers                 |
/// | `.on_state_change(f)`    | no callbacks                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut session = SessionBuilder::new(gps, compass)
///     .config(NavConfig::load(path)?)
///     .frame_loop(|state| overlay.draw(state))
///     .on_state_change(|state| println!("{}", state.eta_label))
///     .build()?;
/// session.start(destination)?;
/// ```
pub struct SessionBuilder<P: PositionSource, H: HeadingSource> {
    position:  P,
    heading:   H,
    config:    NavConfig,
    resources: Vec<Box<dyn PlatformResource>>,
    observers: Vec<Box<dyn NavigationObserver>>,
    draw:      Option<DrawFn>,
}

impl<P: PositionSource, H: HeadingSource> SessionBuilder<P, H> {
    pub fn new(position: P, heading: H) -> Self {
        Self {
            position,
            heading,
            config:    NavConfig::default(),
            resources: Vec::new(),
            observers: Vec::new(),
            draw:      None,
        }
    }

    pub fn config(mut self, config: NavConfig) -> Self {
        self.config = config;
        self
    }

    /// A resource acquired on every `start` and released with the sensors.
    pub fn resource(mut self, resource: impl PlatformResource + 'static) -> Self {
        self.resources.push(Box::new(resource));
        self
    }

    /// Redraw the newest state every `config.frame_interval_ms`, on a
    /// dedicated thread, while the session is tracking.
    pub fn frame_loop<F>(mut self, draw: F) -> Self
    where
        F: FnMut(&NavigationState) + Send + 'static,
    {
        self.draw = Some(Box::new(draw));
        self
    }

    pub fn observer(mut self, observer: impl NavigationObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn on_state_change<F>(self, callback: F) -> Self
    where
        F: FnMut(&NavigationState) + Send + 'static,
    {
        self.observer(StateCallback(callback))
    }

    /// Validate the configuration and return an `Idle` session.
    pub fn build(self) -> SessionResult<NavigationSession<P, H>> {
        self.config.validate()?;

        let latest = LatestState::new();
        let interval = Duration::from_millis(self.config.frame_interval_ms);
        let mut session =
            NavigationSession::from_parts(self.config, self.position, self.heading, latest.clone());

        for resource in self.resources {
            session.add_resource(resource);
        }
        if let Some(draw) = self.draw {
            session.add_resource(Box::new(FrameLoop::new(latest, interval, draw)));
        }
        for observer in self.observers {
            session.observe(observer);
        }
        Ok(session)
    }
}
