//! Password-based encryption of vault payloads.
//!
//! Two schemes are supported, both producing a self-contained ASCII string
//! that embeds whatever salt/nonce it needs:
//!
//! - **Legacy** (default): OpenSSL "Salted__" format. AES-256-CBC with PKCS#7
//!   padding, key and IV from [`derive_key_iv`], base64 encoded. Compatible
//!   with payloads written by the JavaScript AES passphrase helper. There is
//!   no integrity tag: a wrong password or a corrupted payload is detected only
//!   heuristically (bad padding, non-UTF-8 or empty output).
//! - **Age**: ASCII-armored age passphrase encryption (scrypt +
//!   ChaCha20-Poly1305). Authenticated; opt-in for new writes.
//!
//! [`decrypt`] detects the scheme from the payload itself.

use std::io::{Read, Write};
use std::iter;

use aes::Aes256;
use age::armor::{ArmoredReader, ArmoredWriter, Format};
use age::secrecy::SecretString;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroize;

use super::key::{derive_key_iv, SALT_LENGTH};
use crate::error::{DecryptFailure, LockboxError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const SALTED_MAGIC: &[u8; 8] = b"Salted__";
const AES_BLOCK: usize = 16;
const AGE_ARMOR_BEGIN: &str = "-----BEGIN AGE ENCRYPTED FILE-----";

/// Encryption scheme used for a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherScheme {
    /// Salted AES-256-CBC, no integrity tag.
    #[default]
    Legacy,
    /// Armored age passphrase encryption, authenticated.
    Age,
}

impl CipherScheme {
    /// Identify the scheme a payload was written with.
    pub fn detect(ciphertext: &str) -> Self {
        if ciphertext.trim_start().starts_with(AGE_ARMOR_BEGIN) {
            CipherScheme::Age
        } else {
            CipherScheme::Legacy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CipherScheme::Legacy => "legacy",
            CipherScheme::Age => "age",
        }
    }
}

impl std::fmt::Display for CipherScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CipherScheme {
    type Err = LockboxError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(CipherScheme::Legacy),
            "age" => Ok(CipherScheme::Age),
            other => Err(LockboxError::InvalidInput(format!(
                "Unknown cipher scheme: {} (expected legacy or age)",
                other
            ))),
        }
    }
}

/// Encrypt `plaintext` with `password` using the default scheme.
///
/// # Errors
///
/// Returns `LockboxError::InvalidInput` if either argument is empty, or
/// `LockboxError::Encryption` if the primitive fails.
///
/// # Examples
///
/// ```
/// use lockbox_core::crypto::{decrypt, encrypt};
///
/// let payload = encrypt("hello", "abc123!").unwrap();
/// assert!(payload.starts_with("U2FsdGVkX1"));
/// assert_eq!(decrypt(&payload, "abc123!").unwrap(), "hello");
/// ```
pub fn encrypt(plaintext: &str, password: &str) -> Result<String> {
    encrypt_with(CipherScheme::default(), plaintext, password)
}

/// Encrypt `plaintext` with `password` using an explicit scheme.
pub fn encrypt_with(scheme: CipherScheme, plaintext: &str, password: &str) -> Result<String> {
    if plaintext.is_empty() {
        return Err(LockboxError::InvalidInput(
            "Plaintext cannot be empty".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(LockboxError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    debug!(scheme = %scheme, bytes = plaintext.len(), "encrypting payload");
    match scheme {
        CipherScheme::Legacy => {
            let mut salt = [0u8; SALT_LENGTH];
            getrandom::getrandom(&mut salt)
                .map_err(|e| LockboxError::Encryption(format!("Failed to generate salt: {}", e)))?;
            seal_salted(plaintext.as_bytes(), password, &salt)
        }
        CipherScheme::Age => seal_armored(plaintext.as_bytes(), password),
    }
}

/// Decrypt a payload produced by [`encrypt`] or [`encrypt_with`].
///
/// Never panics on malformed input. Succeeds only when the decrypted bytes
/// form non-empty UTF-8 text; everything else (wrong password, truncated or
/// tampered payload, foreign data) is `WrongPasswordOrCorruptData`.
pub fn decrypt(ciphertext: &str, password: &str) -> std::result::Result<String, DecryptFailure> {
    let scheme = CipherScheme::detect(ciphertext);
    let opened = match scheme {
        CipherScheme::Legacy => open_salted(ciphertext.trim(), password),
        CipherScheme::Age => open_armored(ciphertext.trim(), password),
    };

    match opened {
        Ok(bytes) => text_from_bytes(bytes),
        Err(reason) => {
            debug!(scheme = %scheme, reason, "decryption rejected");
            Err(DecryptFailure::WrongPasswordOrCorruptData)
        }
    }
}

/// Heuristic success check: non-empty, valid UTF-8.
fn text_from_bytes(bytes: Vec<u8>) -> std::result::Result<String, DecryptFailure> {
    match String::from_utf8(bytes) {
        Ok(text) if !text.is_empty() => Ok(text),
        Ok(_) => {
            debug!("decryption produced empty output");
            Err(DecryptFailure::WrongPasswordOrCorruptData)
        }
        Err(err) => {
            let mut bytes = err.into_bytes();
            bytes.zeroize();
            debug!("decryption produced non-UTF-8 output");
            Err(DecryptFailure::WrongPasswordOrCorruptData)
        }
    }
}

pub(crate) fn seal_salted(
    plaintext: &[u8],
    password: &str,
    salt: &[u8; SALT_LENGTH],
) -> Result<String> {
    let derived = derive_key_iv(password.as_bytes(), salt);
    let cipher = Aes256CbcEnc::new_from_slices(derived.key(), derived.iv())
        .map_err(|e| LockboxError::Encryption(format!("Failed to create cipher: {}", e)))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut framed = Vec::with_capacity(SALTED_MAGIC.len() + SALT_LENGTH + ciphertext.len());
    framed.extend_from_slice(SALTED_MAGIC);
    framed.extend_from_slice(salt);
    framed.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(framed))
}

fn open_salted(encoded: &str, password: &str) -> std::result::Result<Vec<u8>, &'static str> {
    let framed = STANDARD.decode(encoded).map_err(|_| "payload is not base64")?;
    if framed.len() < SALTED_MAGIC.len() + SALT_LENGTH + AES_BLOCK {
        return Err("payload too short");
    }

    let (magic, rest) = framed.split_at(SALTED_MAGIC.len());
    if magic != SALTED_MAGIC {
        return Err("missing salt header");
    }
    let (salt_bytes, body) = rest.split_at(SALT_LENGTH);
    if body.len() % AES_BLOCK != 0 {
        return Err("ciphertext is not block aligned");
    }

    let mut salt = [0u8; SALT_LENGTH];
    salt.copy_from_slice(salt_bytes);
    let derived = derive_key_iv(password.as_bytes(), &salt);
    let cipher = Aes256CbcDec::new_from_slices(derived.key(), derived.iv())
        .map_err(|_| "invalid key length")?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|_| "bad padding")
}

fn seal_armored(plaintext: &[u8], password: &str) -> Result<String> {
    let encryptor =
        age::Encryptor::with_user_passphrase(SecretString::from(password.to_string()));

    let mut armored = Vec::new();
    let armor = ArmoredWriter::wrap_output(&mut armored, Format::AsciiArmor)
        .map_err(|e| LockboxError::Encryption(format!("Failed to create armor: {}", e)))?;
    let mut writer = encryptor
        .wrap_output(armor)
        .map_err(|e| LockboxError::Encryption(format!("Failed to create encryptor: {}", e)))?;

    writer
        .write_all(plaintext)
        .map_err(|e| LockboxError::Encryption(format!("Encryption write failed: {}", e)))?;
    writer
        .finish()
        .and_then(|armor| armor.finish())
        .map_err(|e| LockboxError::Encryption(format!("Encryption finish failed: {}", e)))?;

    String::from_utf8(armored)
        .map_err(|e| LockboxError::Encryption(format!("Armor is not text: {}", e)))
}

fn open_armored(armored: &str, password: &str) -> std::result::Result<Vec<u8>, &'static str> {
    let decryptor = age::Decryptor::new(ArmoredReader::new(armored.as_bytes()))
        .map_err(|_| "invalid age header")?;

    let identity = age::scrypt::Identity::new(SecretString::from(password.to_string()));
    let mut reader = decryptor
        .decrypt(iter::once(&identity as &dyn age::Identity))
        .map_err(|_| "age key unwrap failed")?;

    let mut decrypted = Vec::new();
    if reader.read_to_end(&mut decrypted).is_err() {
        decrypted.zeroize();
        return Err("age payload failed authentication");
    }
    Ok(decrypted)
}
