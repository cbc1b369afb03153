//! Cryptographic operations for Lockbox.
//!
//! - **policy**: password requirements checked before any encryption
//! - **key**: OpenSSL-compatible key/IV derivation for salted payloads
//! - **cipher**: payload encryption and heuristic decryption
//!
//! ## Threat Model
//!
//! We defend against:
//! - Reading record payloads without the password
//!
//! We do NOT defend against:
//! - Offline brute force of weak passwords (no KDF hardening in the legacy scheme)
//! - Undetected tampering of legacy payloads (no integrity tag)
//! - Anyone holding both a payload and its password; tags are not access control

pub mod cipher;
pub mod key;
pub mod policy;

pub use cipher::{decrypt, encrypt, encrypt_with, CipherScheme};
pub use key::{derive_key_iv, DerivedKey};
pub use policy::{is_valid, validate_password, MIN_PASSWORD_LENGTH, SPECIAL_CHARACTERS};
