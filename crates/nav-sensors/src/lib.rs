//! `nav-sensors` — everything between the device sensors and the guidance
//! state machine.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                     |
//! |------------------|--------------------------------------------------------------|
//! | [`source`]       | `PositionSource` / `HeadingSource` traits, `SensorEvent`     |
//! | [`subscription`] | `Subscription` — the cancel handle every watch returns       |
//! | [`fixture`]      | Scripted sources that replay fixes/headings on a timer       |
//! | [`track`]        | CSV track loader feeding the scripted position source        |
//! | [`filter`]       | `AccuracyFilter` — drops fixes with poor reported accuracy   |
//! | [`smoother`]     | `HeadingSmoother` — wrap-aware low-pass compass filter       |
//! | [`error`]        | `SensorError`, `SensorKind`, `SensorResult<T>`               |
//!
//! # Push model
//!
//! Sources are push-based.  `subscribe` hands the source an [`EventSink`];
//! the source delivers events into it whenever it has data, from whatever
//! thread it likes, until the returned [`Subscription`] is cancelled or
//! dropped.  The consumer (the navigation session) owns the receiving end
//! and processes events one at a time on its own thread.

pub mod error;
pub mod filter;
pub mod fixture;
pub mod smoother;
pub mod source;
pub mod subscription;
pub mod track;


pub use error::{SensorError, SensorKind, SensorResult};
pub use filter::{AccuracyFilter, FilterStats, RejectReason, Rejected};
pub use fixture::{Availability, ScriptedHeadingSource, ScriptedPositionSource};
pub use smoother::HeadingSmoother;
pub use source::{EventSink, HeadingSource, PositionSource, SensorEvent};
pub use subscription::{StopSignal, Subscription};
pub use track::{load_track_csv, load_track_reader};
