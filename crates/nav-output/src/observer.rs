//! `TraceObserver<W>` — bridges `NavigationObserver` to a `TraceWriter`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nav_core::{Millis, NavigationState};
use nav_sensors::Rejected;
use nav_session::{NavigationObserver, SessionPhase};

use crate::row::{PhaseRow, RejectionRow, StateRow};
use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult};

struct Inner<W> {
    writer:     W,
    next_seq:   u64,
    last_error: Option<OutputError>,
}

impl<W: TraceWriter> Inner<W> {
    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

/// A [`NavigationObserver`] that records states, lifecycle transitions, and
/// rejected fixes to any [`TraceWriter`] backend.
///
/// The session takes ownership of its observers, so this is a cheap handle:
/// register one clone with the session and keep another to call
/// [`take_error`][Self::take_error] or [`finish`][Self::finish] afterwards.
/// Writer errors are stored because observer methods have no return value.
///
/// The writer is finished automatically when the session reaches a terminal
/// phase and flushed when it is stopped.
pub struct TraceObserver<W: TraceWriter> {
    inner: Arc<Mutex<Inner<W>>>,
}

impl<W: TraceWriter> Clone for TraceObserver<W> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                writer,
                next_seq:   0,
                last_error: None,
            })),
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&self) -> Option<OutputError> {
        self.lock().last_error.take()
    }

    /// States recorded so far.
    pub fn states_written(&self) -> u64 {
        self.lock().next_seq
    }

    /// Flush and close the writer.  Idempotent.
    pub fn finish(&self) {
        let mut inner = self.lock();
        let result = inner.writer.finish();
        inner.store_err(result);
    }

    fn lock(&self) -> MutexGuard<'_, Inner<W>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: TraceWriter + Send> NavigationObserver for TraceObserver<W> {
    fn on_state(&mut self, state: &NavigationState) {
        let mut inner = self.lock();
        let row = StateRow::new(inner.next_seq, Millis::now(), state);
        inner.next_seq += 1;
        let result = inner.writer.write_state(&row);
        inner.store_err(result);
    }

    fn on_phase(&mut self, from: SessionPhase, to: SessionPhase) {
        let mut inner = self.lock();
        let result = inner.writer.write_phase(&PhaseRow::new(Millis::now(), from, to));
        inner.store_err(result);

        let result = if to.is_terminal() {
            inner.writer.finish()
        } else if to == SessionPhase::Idle {
            inner.writer.flush()
        } else {
            Ok(())
        };
        inner.store_err(result);
    }

    fn on_fix_rejected(&mut self, rejected: &Rejected) {
        let mut inner = self.lock();
        let result = inner.writer.write_rejection(&RejectionRow::new(Millis::now(), rejected));
        inner.store_err(result);
    }
}
