//! Source traits and the event type they emit.

use std::sync::mpsc::Sender;

use nav_core::{HeadingSample, PositionFix, WatchOptions};

use crate::{SensorError, SensorKind, SensorResult, Subscription};

/// One item on the merged sensor stream.
#[derive(Debug)]
pub enum SensorEvent {
    Position(PositionFix),
    Heading(HeadingSample),
    /// A source failed after subscribing (permission revoked, hardware gone).
    Lost {
        sensor: SensorKind,
        error:  SensorError,
    },
}

/// Sending half of the session's event stream, handed to each source.
#[derive(Clone, Debug)]
pub struct EventSink(Sender<SensorEvent>);

impl EventSink {
    pub fn new(tx: Sender<SensorEvent>) -> Self {
        EventSink(tx)
    }

    /// Deliver `event`.  Returns `false` once the consumer has gone away;
    /// sources should stop producing at that point.
    pub fn send(&self, event: SensorEvent) -> bool {
        self.0.send(event).is_ok()
    }
}

/// "Where is the device now."
///
/// `subscribe` either grants the watch and returns its [`Subscription`], or
/// fails synchronously with [`SensorError::PermissionDenied`] /
/// [`SensorError::Unsupported`].  Fixes are pushed into `sink` until the
/// subscription is cancelled.
pub trait PositionSource: Send {
    fn subscribe(&mut self, options: &WatchOptions, sink: EventSink) -> SensorResult<Subscription>;
}

/// "Which way is the device facing."
///
/// Same contract as [`PositionSource`].  Returning
/// [`SensorError::Unsupported`] is not fatal for a session: it degrades to
/// distance-only guidance.
pub trait HeadingSource: Send {
    fn subscribe(&mut self, sink: EventSink) -> SensorResult<Subscription>;
}

impl<P: PositionSource + ?Sized> PositionSource for Box<P> {
    fn subscribe(&mut self, options: &WatchOptions, sink: EventSink) -> SensorResult<Subscription> {
        (**self).subscribe(options, sink)
    }
}

impl<H: HeadingSource + ?Sized> HeadingSource for Box<H> {
    fn subscribe(&mut self, sink: EventSink) -> SensorResult<Subscription> {
        (**self).subscribe(sink)
    }
}
