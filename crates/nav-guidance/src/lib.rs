//! `nav-guidance` — turns a position, a heading, and a destination into a
//! [`NavigationState`][nav_core::NavigationState].
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`hysteresis`] | `TurnHysteresis` — dead-band classifier for turn direction   |
//! | [`machine`]    | `GuidanceStateMachine` — distance, bearing, turn, arrival    |
//!
//! # Per-update pipeline
//!
//! ```text
//! distance  = haversine(position, destination)
//! bearing   = forward_azimuth(position, destination)
//! relative  = wrap_360(bearing - heading)
//! held      = hysteresis.update(relative)          // Straight / Left / Right
//! shown     = TurnAround if relative in (135, 225) else held
//! on_track  = held == Straight
//! arrived   = distance < max(arrival_radius, gps_accuracy)
//! ```
//!
//! Once a state with `arrived = true` has been produced the machine is
//! latched: further updates return `None` until [`reset`][GuidanceStateMachine::reset].

pub mod hysteresis;
pub mod machine;


pub use hysteresis::TurnHysteresis;
pub use machine::GuidanceStateMachine;
