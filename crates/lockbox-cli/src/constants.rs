//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const GENERAL: i32 = 1;

    /// Resource not found (config, store, record).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password or corrupt payload).
    pub const AUTH_FAILED: i32 = 5;

    /// The store rejected a read or write.
    pub const STORAGE_FAILED: i32 = 6;
}

/// Environment variables read by the CLI.
pub mod env {
    /// Password used instead of prompting.
    pub const PASSWORD: &str = "LOCKBOX_PASSWORD";

    /// Config file override.
    pub const CONFIG: &str = "LOCKBOX_CONFIG";

    /// Log filter directives.
    pub const LOG: &str = "LOCKBOX_LOG";
}
