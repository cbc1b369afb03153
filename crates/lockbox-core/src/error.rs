//! Error types for Lockbox core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these to
//! user-facing messages and exit codes.

use thiserror::Error;

/// Result type alias for Lockbox operations.
pub type Result<T> = std::result::Result<T, LockboxError>;

/// Core error type for Lockbox operations.
#[derive(Debug, Error)]
pub enum LockboxError {
    /// A save precondition failed; nothing was encrypted or written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The cipher primitive failed on well-formed input.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// The record store rejected an append or a subscription.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Decryption did not yield usable text (wrong password or corrupt payload).
    #[error("Access denied: invalid security password")]
    AccessDenied,

    /// Record not found by ID
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Validation failures raised before any encryption happens.
///
/// Each variant carries its own user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Password is required.")]
    MissingPassword,

    #[error("Content is required: enter a message or attach a file.")]
    MissingContent,

    #[error("A user tag is required.")]
    MissingTag,

    #[error(
        "Password must be at least 6 characters long and contain at least one special character."
    )]
    WeakPassword,

    #[error("File size exceeds 1MB limit ({size} bytes, max {limit}). Please select a smaller file.")]
    PayloadTooLarge { size: usize, limit: usize },
}

/// Decryption did not produce non-empty UTF-8 text.
///
/// At the primitive level a wrong password cannot be told apart from a
/// corrupted payload, so both land here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptFailure {
    #[error("Wrong password or corrupt data")]
    WrongPasswordOrCorruptData,
}

impl From<DecryptFailure> for LockboxError {
    fn from(_: DecryptFailure) -> Self {
        LockboxError::AccessDenied
    }
}

impl From<rusqlite::Error> for LockboxError {
    fn from(err: rusqlite::Error) -> Self {
        LockboxError::Storage(format!("SQLite error: {}", err))
    }
}

impl From<std::io::Error> for LockboxError {
    fn from(err: std::io::Error) -> Self {
        LockboxError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrypt_failure_maps_to_access_denied() {
        let err: LockboxError = DecryptFailure::WrongPasswordOrCorruptData.into();
        assert!(matches!(err, LockboxError::AccessDenied));
    }

    #[test]
    fn test_validation_messages_are_distinct() {
        let messages = [
            ValidationError::MissingPassword.to_string(),
            ValidationError::MissingContent.to_string(),
            ValidationError::MissingTag.to_string(),
            ValidationError::WeakPassword.to_string(),
            ValidationError::PayloadTooLarge {
                size: 2,
                limit: 1,
            }
            .to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_validation_wraps_transparently() {
        let err: LockboxError = ValidationError::WeakPassword.into();
        assert_eq!(err.to_string(), ValidationError::WeakPassword.to_string());
    }
}
