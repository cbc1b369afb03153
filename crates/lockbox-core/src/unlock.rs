//! Unlock flow for a single record.
//!
//! ```text
//! Idle -> AwaitingPassword -> Decrypting -> Disambiguating -> Succeeded
//!              |                   |
//!              v                   v
//!            Idle               Failed
//! ```
//!
//! One [`UnlockFlow`] per attempt. The password request is an async
//! suspension point ([`PasswordPrompt`]); cancelling it returns to `Idle`
//! without surfacing an error. Decryption and file decoding run on the
//! blocking pool. The payload type is re-derived from the decrypted content
//! and the stored `type` is only compared against it.

use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::codec::{decode_file, extension_for_mime, is_encoded_file};
use crate::crypto::decrypt;
use crate::error::{LockboxError, Result};
use crate::record::{RecordKind, VaultRecord};

/// Prefix of every generated download filename.
pub const DOWNLOAD_PREFIX: &str = "Decrypted_Vault_File_";

/// Where an unlock attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockState {
    Idle,
    AwaitingPassword,
    Decrypting,
    Disambiguating,
    Succeeded,
    Failed,
}

impl UnlockState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UnlockState::Succeeded | UnlockState::Failed)
    }
}

/// Answer to a password request.
pub enum PromptResponse {
    Password(SecretString),
    Cancelled,
}

impl PromptResponse {
    /// Wrap raw input; empty input counts as a cancellation.
    pub fn from_input(input: String) -> Self {
        if input.is_empty() {
            PromptResponse::Cancelled
        } else {
            PromptResponse::Password(SecretString::from(input))
        }
    }
}

impl std::fmt::Debug for PromptResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptResponse::Password(_) => f.write_str("Password([REDACTED])"),
            PromptResponse::Cancelled => f.write_str("Cancelled"),
        }
    }
}

/// Asks the user for the password of a record.
#[async_trait]
pub trait PasswordPrompt: Send + Sync {
    async fn request_password(&self, record: &VaultRecord) -> PromptResponse;
}

/// A decrypted file, ready to be written out.
pub struct FileDownload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Zeroizing<Vec<u8>>,
}

impl std::fmt::Debug for FileDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDownload")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// What a successful unlock delivers.
#[derive(Debug)]
pub enum Revealed {
    /// Show the text verbatim.
    Message(Zeroizing<String>),
    /// Offer the file for download.
    File(FileDownload),
}

impl Revealed {
    pub fn kind(&self) -> RecordKind {
        match self {
            Revealed::Message(_) => RecordKind::Text,
            Revealed::File(_) => RecordKind::File,
        }
    }
}

/// How an unlock attempt ended.
#[derive(Debug)]
pub enum UnlockOutcome {
    /// The prompt was abandoned; nothing happened.
    Cancelled,
    Revealed(Revealed),
    /// Wrong password or corrupt payload.
    Denied,
}

/// Build the download filename for a file decrypted at `millis`.
pub fn download_filename(mime_type: &str, millis: i64) -> String {
    match extension_for_mime(mime_type) {
        Some(ext) => format!("{}{}.{}", DOWNLOAD_PREFIX, millis, ext),
        None => format!("{}{}", DOWNLOAD_PREFIX, millis),
    }
}

/// One unlock attempt against one record.
#[derive(Debug)]
pub struct UnlockFlow {
    record: VaultRecord,
    state: UnlockState,
}

impl UnlockFlow {
    pub fn new(record: VaultRecord) -> Self {
        Self {
            record,
            state: UnlockState::Idle,
        }
    }

    pub fn state(&self) -> UnlockState {
        self.state
    }

    pub fn record(&self) -> &VaultRecord {
        &self.record
    }

    /// Request a password: `Idle -> AwaitingPassword`.
    pub fn begin(&mut self) -> Result<()> {
        self.expect_state(UnlockState::Idle)?;
        self.transition(UnlockState::AwaitingPassword);
        Ok(())
    }

    /// Abandon the password request: `AwaitingPassword -> Idle`.
    pub fn cancel(&mut self) -> Result<()> {
        self.expect_state(UnlockState::AwaitingPassword)?;
        self.transition(UnlockState::Idle);
        Ok(())
    }

    /// Feed the prompt's answer into the flow.
    ///
    /// # Errors
    ///
    /// Returns `LockboxError::InvalidInput` if the flow is not awaiting a
    /// password. A wrong password is not an error; it yields
    /// [`UnlockOutcome::Denied`].
    pub async fn submit_password(&mut self, response: PromptResponse) -> Result<UnlockOutcome> {
        self.expect_state(UnlockState::AwaitingPassword)?;

        let password = match response {
            PromptResponse::Password(password) if !password.expose_secret().is_empty() => {
                password
            }
            _ => {
                self.transition(UnlockState::Idle);
                return Ok(UnlockOutcome::Cancelled);
            }
        };

        self.transition(UnlockState::Decrypting);
        let payload = self.record.payload.clone();
        let decrypted = tokio::task::spawn_blocking(move || {
            decrypt(&payload, password.expose_secret()).map(Zeroizing::new)
        })
        .await
        .map_err(|e| LockboxError::Storage(format!("Decryption task failed: {}", e)));

        let text = match decrypted {
            Ok(Ok(text)) => text,
            Ok(Err(_)) => {
                self.transition(UnlockState::Failed);
                return Ok(UnlockOutcome::Denied);
            }
            Err(err) => {
                self.transition(UnlockState::Failed);
                return Err(err);
            }
        };

        self.transition(UnlockState::Disambiguating);
        let revealed = self.disambiguate(text).await;
        if revealed.kind() != self.record.kind {
            warn!(
                id = %self.record.id,
                stored = %self.record.kind,
                derived = %revealed.kind(),
                "stored record type disagrees with decrypted content"
            );
        }

        self.transition(UnlockState::Succeeded);
        Ok(UnlockOutcome::Revealed(revealed))
    }

    /// Drive the whole flow, asking `prompt` for the password.
    pub async fn run(&mut self, prompt: &dyn PasswordPrompt) -> Result<UnlockOutcome> {
        self.begin()?;
        let response = prompt.request_password(&self.record).await;
        self.submit_password(response).await
    }

    async fn disambiguate(&self, text: Zeroizing<String>) -> Revealed {
        if !is_encoded_file(&text) {
            return Revealed::Message(text);
        }

        let encoded = text.clone();
        let decoded = tokio::task::spawn_blocking(move || decode_file(&encoded)).await;
        match decoded {
            Ok(Ok(file)) => Revealed::File(FileDownload {
                filename: download_filename(&file.mime_type, Utc::now().timestamp_millis()),
                mime_type: file.mime_type,
                bytes: Zeroizing::new(file.bytes),
            }),
            Ok(Err(err)) => {
                warn!(id = %self.record.id, error = %err, "file payload did not decode, showing as text");
                Revealed::Message(text)
            }
            Err(err) => {
                warn!(id = %self.record.id, error = %err, "file decode task failed, showing as text");
                Revealed::Message(text)
            }
        }
    }

    fn expect_state(&self, expected: UnlockState) -> Result<()> {
        if self.state != expected {
            return Err(LockboxError::InvalidInput(format!(
                "Unlock flow is {:?}, expected {:?}",
                self.state, expected
            )));
        }
        Ok(())
    }

    fn transition(&mut self, next: UnlockState) {
        debug!(id = %self.record.id, from = ?self.state, to = ?next, "unlock state");
        self.state = next;
    }
}
