//! Session observer trait for state delivery and lifecycle reporting.

use nav_core::NavigationState;
use nav_sensors::Rejected;

use crate::SessionPhase;

/// Callbacks invoked by a [`NavigationSession`][crate::NavigationSession]
/// while it handles sensor events.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Every observer registered on a session
/// receives every call, in registration order.
///
/// # Example — console printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl NavigationObserver for Printer {
///     fn on_state(&mut self, state: &NavigationState) {
///         println!("{:.0} m {} ({})", state.distance_m, state.turn_direction, state.eta_label);
///     }
/// }
/// ```
pub trait NavigationObserver: Send {
    /// A new navigation state was computed.  Called once per accepted fix or
    /// heading sample after both inputs are known; never called again after
    /// the state with `arrived = true`.
    fn on_state(&mut self, _state: &NavigationState) {}

    /// The session moved from `from` to `to`.
    fn on_phase(&mut self, _from: SessionPhase, _to: SessionPhase) {}

    /// A position fix was discarded before reaching guidance.
    fn on_fix_rejected(&mut self, _rejected: &Rejected) {}
}

/// Adapts a plain closure into a state-only observer.
pub struct StateCallback<F>(pub F);

impl<F> NavigationObserver for StateCallback<F>
where
    F: FnMut(&NavigationState) + Send,
{
    fn on_state(&mut self, state: &NavigationState) {
        (self.0)(state)
    }
}
