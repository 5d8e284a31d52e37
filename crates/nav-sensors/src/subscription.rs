//! The handle returned by every `subscribe` call.
//!
//! A [`Subscription`] is a scoped resource: cancelling it (explicitly via
//! [`Subscription::unsubscribe`] or implicitly on drop) signals the source's
//! worker to stop and joins it before returning.  No delivery happens after
//! cancellation completes.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::{SensorKind, SensorResult};

// ── StopSignal ────────────────────────────────────────────────────────────────

/// Worker-side half of a subscription: tells the worker when to quit.
pub struct StopSignal(Receiver<()>);

impl StopSignal {
    /// Sleep for up to `period`, waking early if the subscription is
    /// cancelled.  Returns `true` if the worker should stop.
    pub fn wait(&self, period: Duration) -> bool {
        if period.is_zero() {
            return self.is_stopped();
        }
        match self.0.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => false,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }

    /// Non-blocking check.
    pub fn is_stopped(&self) -> bool {
        !matches!(self.0.try_recv(), Err(TryRecvError::Empty))
    }
}

// ── Subscription ──────────────────────────────────────────────────────────────

/// Cancel handle for an active watch.
pub struct Subscription {
    sensor: SensorKind,
    stop:   Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Run `work` on a dedicated, named worker thread.  `work` receives the
    /// [`StopSignal`] it must honour.
    pub fn spawn<F>(sensor: SensorKind, work: F) -> SensorResult<Self>
    where
        F: FnOnce(StopSignal) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name(format!("nav-{sensor}"))
            .spawn(move || work(StopSignal(rx)))?;
        Ok(Self {
            sensor,
            stop:   Some(tx),
            worker: Some(worker),
        })
    }

    #[inline]
    pub fn sensor(&self) -> SensorKind {
        self.sensor
    }

    /// `true` until the subscription has been cancelled.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.stop.is_some()
    }

    /// Cancel and consume the subscription.
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    /// Cancel in place.  Idempotent.
    pub fn cancel(&mut self) {
        let Some(stop) = self.stop.take() else {
            return;
        };
        // The worker may already have exited on its own; a failed send is fine.
        let _ = stop.send(());
        drop(stop);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("{} worker panicked before shutdown", self.sensor);
            }
        }
        debug!("{} subscription released", self.sensor);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("sensor", &self.sensor)
            .field("active", &self.is_active())
            .finish()
    }
}
