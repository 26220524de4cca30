//! Error types for configuration loading and the driver handle.
//!
//! The tick step itself cannot fail: every value it touches is produced
//! internally and every external input is clamped. Errors only surface when
//! reading a tuning file or talking to a session task that has shut down.

use std::fmt;

/// Top-level error enum for the simulation crate.
#[derive(Debug)]
pub enum SimError {
    /// A tuning value is outside the range the simulation can run with.
    InvalidTuning {
        /// Name of the rejected field.
        field: &'static str,
        /// Human-readable description of the accepted range.
        reason: &'static str,
    },

    /// The tuning JSON could not be parsed.
    TuningParse(serde_json::Error),

    /// The tuning file could not be read.
    Io(std::io::Error),

    /// The session task has exited, so the command was not delivered.
    DriverClosed,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidTuning { field, reason } => {
                write!(f, "invalid tuning value '{}': {}", field, reason)
            }
            SimError::TuningParse(err) => write!(f, "failed to parse tuning: {}", err),
            SimError::Io(err) => write!(f, "failed to read tuning file: {}", err),
            SimError::DriverClosed => write!(f, "simulation driver is no longer running"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::TuningParse(err) => Some(err),
            SimError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::TuningParse(err)
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Io(err)
    }
}
