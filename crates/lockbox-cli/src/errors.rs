//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use lockbox_core::LockboxError;

use crate::constants::exit_codes;

/// Message shown for a failed unlock.
pub const ACCESS_DENIED: &str = "Access Denied: Invalid Security Password.";

/// Message shown when a save cannot be written.
pub const SAVE_FAILED: &str = "System Error: Failed to save data.";

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, store, record)
    NotFound { message: String, hint: String },

    /// Wrong password or corrupt payload
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input, including failed save preconditions
    InvalidInput(String),

    /// The store rejected a read or write
    Storage {
        message: String,
        hint: Option<String>,
    },

    /// Anything else, e.g. a cipher failure
    Failed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// A storage failure; the underlying cause is shown as the hint.
    pub fn storage(message: impl Into<String>, cause: impl fmt::Display) -> Self {
        CliError::Storage {
            message: message.into(),
            hint: Some(cause.to_string()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CliError::NotFound { message, .. }
            | CliError::AuthFailed { message, .. }
            | CliError::Storage { message, .. } => message,
            CliError::InvalidInput(message) | CliError::Failed(message) => message,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::NotFound { hint, .. } => Some(hint),
            CliError::AuthFailed { hint, .. } | CliError::Storage { hint, .. } => hint.as_deref(),
            CliError::InvalidInput(_) | CliError::Failed(_) => None,
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Storage { .. } => exit_codes::STORAGE_FAILED,
            CliError::Failed(_) => exit_codes::GENERAL,
        }
    }
}

impl From<LockboxError> for CliError {
    fn from(err: LockboxError) -> Self {
        match err {
            LockboxError::Validation(inner) => CliError::InvalidInput(inner.to_string()),
            LockboxError::InvalidInput(message) => CliError::InvalidInput(message),
            LockboxError::AccessDenied => CliError::auth_failed(ACCESS_DENIED),
            LockboxError::RecordNotFound(id) => CliError::not_found(
                format!("Record not found: {}", id),
                "Run `lockbox list` to find record IDs.",
            ),
            LockboxError::Storage(cause) => CliError::storage("Storage error", cause),
            other => CliError::Failed(other.to_string()),
        }
    }
}
