//! Session phases and terminal error reasons.

use std::fmt;

use nav_sensors::SensorError;

/// Why a session ended in [`SessionPhase::Error`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ErrorReason {
    PermissionDenied,
    SensorUnsupported,
    DestinationInvalid,
}

impl ErrorReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorReason::PermissionDenied   => "permission_denied",
            ErrorReason::SensorUnsupported  => "sensor_unsupported",
            ErrorReason::DestinationInvalid => "destination_invalid",
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&SensorError> for ErrorReason {
    fn from(err: &SensorError) -> Self {
        match err {
            SensorError::PermissionDenied(_) => ErrorReason::PermissionDenied,
            // A source that cannot deliver, for whatever reason, is as good
            // as missing.
            SensorError::Unsupported(_) | SensorError::Track(_) | SensorError::Io(_) => {
                ErrorReason::SensorUnsupported
            }
        }
    }
}

/// Where a session is in its lifecycle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Acquiring sensor permissions and platform resources.
    Initializing,
    /// Consuming sensor events and emitting states.
    Tracking,
    /// Terminal: the final state had `arrived = true`.
    Arrived,
    /// Terminal: a fatal failure; create a new session to retry.
    Error(ErrorReason),
}

impl SessionPhase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Arrived | SessionPhase::Error(_))
    }

    /// Subscriptions are held in these phases.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, SessionPhase::Initializing | SessionPhase::Tracking)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle         => f.write_str("idle"),
            SessionPhase::Initializing => f.write_str("initializing"),
            SessionPhase::Tracking     => f.write_str("tracking"),
            SessionPhase::Arrived      => f.write_str("arrived"),
            SessionPhase::Error(r)     => write!(f, "error({r})"),
        }
    }
}
