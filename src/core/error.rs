//! Trace error types

use thiserror::Error;

/// Errors that can occur outside the tracker itself
///
/// The session tracker never fails: unknown keys are lookups that return
/// `None` or mutations that do nothing. Errors only come from reading event
/// streams, parsing them, and loading configuration.
#[derive(Error, Debug)]
pub enum TraceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line of an event stream could not be decoded
    #[error("Invalid event on line {line}: {message}")]
    InvalidEvent {
        /// 1-based line number in the stream
        line: usize,
        /// Decoder message
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TraceError {
    /// Create an invalid event error
    pub fn invalid_event(line: usize, message: impl Into<String>) -> Self {
        TraceError::InvalidEvent {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        TraceError::InvalidConfig(msg.into())
    }
}

/// Result type alias for trace operations
pub type TraceResult<T> = Result<T, TraceError>;
