//! Shared read-only view of the newest navigation state.

use std::sync::{Arc, PoisonError, RwLock};

use nav_core::NavigationState;

/// Cheaply clonable handle to the most recent [`NavigationState`].
///
/// The session is the only writer.  Renderers poll it at their own cadence
/// and always see a complete state, never a partially updated one.
#[derive(Clone, Debug, Default)]
pub struct LatestState(Arc<RwLock<Option<NavigationState>>>);

impl LatestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the newest state, if one has been emitted.
    pub fn get(&self) -> Option<NavigationState> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    pub(crate) fn set(&self, state: NavigationState) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(state);
    }

    pub(crate) fn clear(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
