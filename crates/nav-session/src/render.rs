//! Redraw loop driven from [`LatestState`].
//!
//! The renderer runs on its own cadence, independent of sensor rates: each
//! frame it reads the newest state and hands it to the draw closure.  It is
//! a [`PlatformResource`], so the session starts it with the sensors and
//! cancels it on stop, arrival, or failure.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use nav_core::NavigationState;
use nav_sensors::{SensorKind, SensorResult, Subscription};

use crate::{LatestState, PlatformResource};

type DrawFn = Box<dyn FnMut(&NavigationState) + Send>;

/// Periodic redraw of the newest navigation state.
pub struct FrameLoop {
    latest:   LatestState,
    interval: Duration,
    draw:     Arc<Mutex<DrawFn>>,
    running:  Option<Subscription>,
}

impl FrameLoop {
    /// `interval` is clamped to at least one millisecond.
    pub fn new<F>(latest: LatestState, interval: Duration, draw: F) -> Self
    where
        F: FnMut(&NavigationState) + Send + 'static,
    {
        Self {
            latest,
            interval: interval.max(Duration::from_millis(1)),
            draw:     Arc::new(Mutex::new(Box::new(draw))),
            running:  None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

impl PlatformResource for FrameLoop {
    fn kind(&self) -> SensorKind {
        SensorKind::Display
    }

    fn acquire(&mut self) -> SensorResult<()> {
        if self.running.is_some() {
            return Ok(());
        }
        let latest   = self.latest.clone();
        let draw     = Arc::clone(&self.draw);
        let interval = self.interval;
        let sub = Subscription::spawn(SensorKind::Display, move |stop| {
            while !stop.wait(interval) {
                let Some(state) = latest.get() else { continue };
                let mut draw = draw.lock().unwrap_or_else(PoisonError::into_inner);
                (*draw)(&state);
            }
        })?;
        self.running = Some(sub);
        Ok(())
    }

    fn release(&mut self) {
        if let Some(sub) = self.running.take() {
            sub.unsubscribe();
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.release();
    }
}
