use std::fmt;

use thiserror::Error;

/// Which device capability an error refers to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum SensorKind {
    Position,
    Heading,
    /// AR camera stream.
    Camera,
    /// Animation-frame / redraw handle.
    Display,
}

impl SensorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SensorKind::Position => "position",
            SensorKind::Heading  => "heading",
            SensorKind::Camera   => "camera",
            SensorKind::Display  => "display",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("{0} permission denied")]
    PermissionDenied(SensorKind),

    #[error("{0} is not supported on this device")]
    Unsupported(SensorKind),

    #[error("track parse error: {0}")]
    Track(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SensorError {
    /// `true` for errors that mean "this capability does not exist", as
    /// opposed to "the user said no" or a runtime failure.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, SensorError::Unsupported(_))
    }
}

pub type SensorResult<T> = Result<T, SensorError>;
