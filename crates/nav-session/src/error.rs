use nav_core::NavError;
use nav_sensors::{SensorError, SensorKind};
use thiserror::Error;

use crate::{ErrorReason, SessionPhase};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is already {0}; stop it before starting again")]
    AlreadyActive(SessionPhase),

    #[error("operation needs a tracking session, but the session is {0}")]
    NotTracking(SessionPhase),

    #[error("invalid destination: {0}")]
    DestinationInvalid(String),

    #[error("{0} permission denied")]
    PermissionDenied(SensorKind),

    #[error("{0} is not supported on this device")]
    SensorUnsupported(SensorKind),

    #[error("session failed ({0}); create a new session to retry")]
    Failed(ErrorReason),

    #[error("sensor error: {0}")]
    Sensor(SensorError),

    #[error("configuration error: {0}")]
    Config(#[from] NavError),
}

impl From<SensorError> for SessionError {
    fn from(err: SensorError) -> Self {
        match err {
            SensorError::PermissionDenied(kind) => SessionError::PermissionDenied(kind),
            SensorError::Unsupported(kind)      => SessionError::SensorUnsupported(kind),
            other                               => SessionError::Sensor(other),
        }
    }
}

impl SessionError {
    /// The lifecycle reason this error corresponds to, if it ends a session.
    pub fn reason(&self) -> Option<ErrorReason> {
        match self {
            SessionError::DestinationInvalid(_) => Some(ErrorReason::DestinationInvalid),
            SessionError::PermissionDenied(_)   => Some(ErrorReason::PermissionDenied),
            SessionError::SensorUnsupported(_)  => Some(ErrorReason::SensorUnsupported),
            SessionError::Failed(r)             => Some(*r),
            SessionError::Sensor(e)             => Some(ErrorReason::from(e)),
            SessionError::AlreadyActive(_)
            | SessionError::NotTracking(_)
            | SessionError::Config(_)           => None,
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
