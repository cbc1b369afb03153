//! # Lockbox Core
//!
//! Core library for Lockbox - a password-encrypted vault for short notes and small files.
//!
//! This crate provides the domain logic, cipher, record model and store
//! abstractions independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: password policy, key derivation, payload encryption
//! - **codec**: file payloads as data URLs
//! - **record**: the stored record model
//! - **index**: tag-filtered view over the record stream
//! - **form**: save form state and validation
//! - **sync**: store trait, live subscriptions and adapters
//! - **vault**: encrypt-and-save
//! - **unlock**: password prompt, decryption and delivery of one record

pub mod codec;
pub mod crypto;
pub mod error;
pub mod form;
pub mod index;
pub mod record;
pub mod sync;
pub mod unlock;
pub mod vault;

pub use error::{DecryptFailure, LockboxError, Result, ValidationError};
pub use form::{Attachment, TagPolicy, VaultForm};
pub use index::VaultIndex;
pub use record::{RecordId, RecordKind, VaultRecord};
pub use sync::{MemoryStore, SqliteStore, Subscription, VaultStore};
pub use unlock::{PasswordPrompt, PromptResponse, Revealed, UnlockFlow, UnlockOutcome};
pub use vault::{Submission, Vault};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
