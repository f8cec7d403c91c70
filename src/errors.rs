//! # Error Types Module
//!
//! This module defines the error types shared by the profile store, the
//! external lookups and the conversation engine. Every variant maps to a
//! user-visible reply; none of them is allowed to take the dispatcher down.

use thiserror::Error;

/// Errors produced while handling a tracker operation
#[derive(Debug, Error)]
pub enum TrackerError {
    /// No profile record exists for the user
    #[error("No profile found for user {0}")]
    NotFound(String),
    /// The user typed something that is not the expected number
    #[error("Malformed input: expected {expected}, got {input:?}")]
    MalformedInput {
        expected: &'static str,
        input: String,
    },
    /// A number was accepted but pushes a running total past what fits in it
    #[error("Value out of range: {0}")]
    OutOfRange(&'static str),
    /// A food or weather lookup did not produce a usable answer
    #[error("Lookup failed: {0}")]
    LookupFailed(#[from] LookupError),
    /// The in-progress setup is missing a field that an earlier step should have filled
    #[error("Setup draft is missing {0}")]
    IncompleteSetup(&'static str),
    /// Reading or writing the profile file failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors returned by the external lookup collaborators
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Nothing found for {0:?}")]
    NotFound(String),
    #[error("Service answered with status {0}")]
    Status(u16),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Errors raised by the profile store when a write fails
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TrackerError {
    /// Builds a `MalformedInput` error for the given raw text
    pub fn malformed(expected: &'static str, input: &str) -> Self {
        TrackerError::MalformedInput {
            expected,
            input: input.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting() {
        let err = TrackerError::NotFound("42".to_string());
        assert_eq!(err.to_string(), "No profile found for user 42");

        let err = TrackerError::malformed("grams", "abc");
        assert_eq!(
            err.to_string(),
            "Malformed input: expected grams, got \"abc\""
        );

        let err = TrackerError::from(LookupError::Status(404));
        assert_eq!(err.to_string(), "Lookup failed: Service answered with status 404");

        let err = TrackerError::OutOfRange("minutes");
        assert_eq!(err.to_string(), "Value out of range: minutes");
    }
}
