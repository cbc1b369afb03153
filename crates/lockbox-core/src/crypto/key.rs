//! Key and IV derivation for the salted AES format.
//!
//! Uses the OpenSSL `EVP_BytesToKey` construction (MD5, one iteration), which
//! is what existing salted vault payloads were written with. It performs no
//! hardening; the password is the only secret.

use md5::{Digest, Md5};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-256 key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// CBC initialization vector length in bytes.
pub const IV_LENGTH: usize = 16;

/// Salt length embedded after the `Salted__` marker.
pub const SALT_LENGTH: usize = 8;

/// Key material derived from a password and salt.
///
/// Zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
    iv: [u8; IV_LENGTH],
}

impl DerivedKey {
    /// Raw key bytes. Use only for the immediate cipher operation.
    pub fn key(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Raw IV bytes.
    pub fn iv(&self) -> &[u8; IV_LENGTH] {
        &self.iv
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

/// Derive an AES-256 key and CBC IV from a password and 8-byte salt.
///
/// `D_i = MD5(D_{i-1} || password || salt)`, concatenated until 48 bytes
/// are available; the first 32 form the key, the next 16 the IV.
///
/// # Examples
///
/// ```
/// use lockbox_core::crypto::derive_key_iv;
///
/// let a = derive_key_iv(b"abc123!", b"saltsalt");
/// let b = derive_key_iv(b"abc123!", b"saltsalt");
/// assert_eq!(a.key(), b.key());
/// ```
pub fn derive_key_iv(password: &[u8], salt: &[u8; SALT_LENGTH]) -> DerivedKey {
    let mut material = Vec::with_capacity(KEY_LENGTH + IV_LENGTH + 16);
    let mut previous: Option<[u8; 16]> = None;

    while material.len() < KEY_LENGTH + IV_LENGTH {
        let mut hasher = Md5::new();
        if let Some(block) = previous.as_ref() {
            hasher.update(block);
        }
        hasher.update(password);
        hasher.update(salt);
        let block: [u8; 16] = hasher.finalize().into();
        material.extend_from_slice(&block);
        previous = Some(block);
    }

    let mut key = [0u8; KEY_LENGTH];
    let mut iv = [0u8; IV_LENGTH];
    key.copy_from_slice(&material[..KEY_LENGTH]);
    iv.copy_from_slice(&material[KEY_LENGTH..KEY_LENGTH + IV_LENGTH]);

    material.zeroize();

    DerivedKey { key, iv }
}
