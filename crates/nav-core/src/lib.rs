//! `nav-core` — foundational types for the campus navigation engine.
//!
//! This crate is a dependency of every other `nav-*` crate.  It has no
//! `nav-*` dependencies and only a handful of external ones (`rand`,
//! `thiserror`, `serde` + `ron` for configuration).
//!
//! # What lives here
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`geo`]       | `GeoPoint`, haversine distance, forward bearing, wrapping |
//! | [`eta`]       | Walking ETA in whole minutes and its display label        |
//! | [`time`]      | `Millis` capture timestamps                               |
//! | [`model`]     | Fixes, heading samples, destinations, `NavigationState`   |
//! | [`config`]    | `NavConfig` and its RON loader                            |
//! | [`rng`]       | `NoiseRng` — seeded jitter for sensor fixtures            |
//! | [`error`]     | `NavError`, `NavResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to the public data model.   |

pub mod config;
pub mod error;
pub mod eta;
pub mod geo;
pub mod model;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{HysteresisConfig, NavConfig, TurnAroundWindow, WatchOptions};
pub use error::{NavError, NavResult};
pub use eta::{eta_label, eta_minutes};
pub use geo::{GeoPoint, bearing_deg, distance_m, relative_bearing, wrap_180, wrap_360};
pub use model::{
    Destination, HeadingReading, HeadingSample, NavigationState, PositionFix, TurnDirection,
};
pub use rng::NoiseRng;
pub use time::Millis;
