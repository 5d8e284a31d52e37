//! Scoped ownership of everything a running session holds.
//!
//! Subscriptions and platform resources (camera stream, redraw loop) are
//! acquired during `start` and must all be released when the session stops,
//! arrives, fails partway through initialization, or is dropped.
//! [`SessionResources`] makes that a single call that is safe to repeat.

use log::{debug, warn};
use nav_sensors::{SensorError, SensorKind, SensorResult, Subscription};

/// A device resource the session holds while tracking.
///
/// `acquire` is called once per `start`; `release` is called exactly once
/// after a successful `acquire`.
pub trait PlatformResource: Send {
    fn kind(&self) -> SensorKind;

    fn acquire(&mut self) -> SensorResult<()>;

    fn release(&mut self);
}

impl<R: PlatformResource + ?Sized> PlatformResource for Box<R> {
    fn kind(&self) -> SensorKind {
        (**self).kind()
    }

    fn acquire(&mut self) -> SensorResult<()> {
        (**self).acquire()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Everything acquired by one `start` call.
#[derive(Default)]
pub struct SessionResources {
    subscriptions: Vec<Subscription>,
    held:          Vec<Box<dyn PlatformResource>>,
}

impl SessionResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subscription(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Acquire `resource` and take ownership of it.  On failure the resource
    /// is handed back unacquired along with the error.
    pub fn acquire(
        &mut self,
        mut resource: Box<dyn PlatformResource>,
    ) -> Result<(), (Box<dyn PlatformResource>, SensorError)> {
        match resource.acquire() {
            Ok(()) => {
                debug!("{} acquired", resource.kind());
                self.held.push(resource);
                Ok(())
            }
            Err(e) => {
                warn!("{} could not be acquired: {e}", resource.kind());
                Err((resource, e))
            }
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.is_active()).count()
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// Cancel every subscription and release every held resource, newest
    /// first.  Returns the released resources so they can be acquired again
    /// by a later `start`.  Idempotent.
    pub fn release_all(&mut self) -> Vec<Box<dyn PlatformResource>> {
        while let Some(mut sub) = self.subscriptions.pop() {
            sub.cancel();
        }
        let mut released = Vec::with_capacity(self.held.len());
        while let Some(mut res) = self.held.pop() {
            res.release();
            debug!("{} released", res.kind());
            released.push(res);
        }
        released.reverse();
        released
    }
}

impl Drop for SessionResources {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl std::fmt::Debug for SessionResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionResources")
            .field("subscriptions", &self.subscriptions.len())
            .field("held", &self.held.len())
            .finish()
    }
}
