//! Error types for the scheduler.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for scheduler operations
pub type SchedulerResult<T> = std::result::Result<T, SchedulerError>;

/// Errors that can occur while picking the next target
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    /// The scheduler was called with no targets
    #[error("Target list is empty")]
    EmptyTargetList,

    /// A target name could not be turned into sky coordinates
    #[error("Could not resolve target '{target}': {reason}")]
    TargetResolution { target: String, reason: String },

    /// No grid sample had the sun below the darkness threshold
    #[error("No night window below {threshold_deg}° between {start} and {end}")]
    NoNightWindow {
        threshold_deg: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Malformed or out-of-range right ascension / declination
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Observation site outside the valid latitude/longitude range
    #[error("Invalid site: {0}")]
    InvalidSite(String),

    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SchedulerError {
    /// Build a resolution error for `target`.
    pub fn resolution(target: impl Into<String>, reason: impl ToString) -> Self {
        SchedulerError::TargetResolution {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error is caused by the queue contents rather than the setup.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SchedulerError::EmptyTargetList
                | SchedulerError::TargetResolution { .. }
                | SchedulerError::InvalidCoordinates(_)
        )
    }
}
