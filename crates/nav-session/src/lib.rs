//! `nav-session` — orchestrates one navigation from start to arrival.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──start()──▶ Initializing ──both sources granted──▶ Tracking ──▶ Arrived
//!                        │             (or compass unsupported)   │
//!                        └───────── denial / invalid input ───────┴──▶ Error(reason)
//! ```
//!
//! `Arrived` and `Error` are terminal.  `stop()` releases everything from
//! any phase and returns a live session to `Idle`.
//!
//! # Event handling
//!
//! Sources push [`SensorEvent`][nav_sensors::SensorEvent]s into a channel the
//! session owns.  Each event is handled synchronously, in arrival order, on
//! the thread that drives the session ([`run`][NavigationSession::run],
//! [`pump`][NavigationSession::pump], or direct
//! [`handle_event`][NavigationSession::handle_event] calls):
//!
//! ```text
//! Position(fix)  → AccuracyFilter  → GuidanceStateMachine → observers
//! Heading(raw)   → HeadingSmoother → GuidanceStateMachine → observers
//! ```
//!
//! The smoother and the state machine are owned by the session and touched
//! only from that thread, so no locking is involved.  Renderers read the
//! newest state through [`LatestState`] and never wait on a sensor.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nav_core::{Destination, GeoPoint};
//! use nav_sensors::{ScriptedHeadingSource, ScriptedPositionSource};
//! use nav_session::SessionBuilder;
//!
//! let from = GeoPoint::new(12.9230, 77.5010);
//! let dest = Destination::new(12.9240, 77.4995, "Library");
//! let mut session = SessionBuilder::new(
//!     ScriptedPositionSource::walk(from, dest.point, 20, 5.0),
//!     ScriptedHeadingSource::constant(0.0, 20),
//! )
//! .on_state_change(|s| println!("{:.0} m, {}", s.distance_m, s.turn_direction))
//! .build()?;
//! session.start(dest)?;
//! session.run()?;
//! ```

pub mod builder;
pub mod error;
pub mod latest;
pub mod lifecycle;
pub mod observer;
pub mod render;
pub mod resources;
pub mod session;

#[cfg(test)]
mod tests;

pub use builder::SessionBuilder;
pub use error::{SessionError, SessionResult};
pub use latest::LatestState;
pub use lifecycle::{ErrorReason, SessionPhase};
pub use observer::{NavigationObserver, StateCallback};
pub use render::FrameLoop;
pub use resources::{PlatformResource, SessionResources};
pub use session::NavigationSession;
