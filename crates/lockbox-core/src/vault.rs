//! Encrypt-and-save.
//!
//! [`Vault`] ties the form gate, the cipher and a [`VaultStore`] together.
//! Nothing reaches the store unless the form validated and the payload was
//! fully encrypted.

use std::sync::Arc;

use tracing::debug;

use crate::crypto::{encrypt_with, CipherScheme};
use crate::error::{LockboxError, Result};
use crate::form::{TagPolicy, VaultForm};
use crate::record::{NewRecord, RecordId};
use crate::sync::VaultStore;

/// Write side of the vault.
pub struct Vault<S: VaultStore> {
    store: Arc<S>,
    scheme: CipherScheme,
    tags: TagPolicy,
}

impl<S: VaultStore> Clone for Vault<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            scheme: self.scheme,
            tags: self.tags,
        }
    }
}

/// Result of [`Vault::submit`]: the form to show next, and what happened.
#[derive(Debug)]
pub struct Submission {
    /// Cleared on success; exactly the submitted form on failure.
    pub form: VaultForm,
    pub result: Result<RecordId>,
}

impl Submission {
    pub fn is_saved(&self) -> bool {
        self.result.is_ok()
    }
}

impl<S: VaultStore> Vault<S> {
    /// Legacy cipher, tags required.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            scheme: CipherScheme::default(),
            tags: TagPolicy::default(),
        }
    }

    pub fn with_scheme(mut self, scheme: CipherScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_tag_policy(mut self, tags: TagPolicy) -> Self {
        self.tags = tags;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn scheme(&self) -> CipherScheme {
        self.scheme
    }

    pub fn tag_policy(&self) -> TagPolicy {
        self.tags
    }

    /// Validate, encrypt and append one record.
    ///
    /// # Errors
    ///
    /// - `LockboxError::Validation` if a precondition fails (nothing encrypted)
    /// - `LockboxError::Encryption` if the cipher fails (nothing written)
    /// - `LockboxError::Storage` if the append is rejected
    pub async fn encrypt_and_save(&self, form: &VaultForm) -> Result<RecordId> {
        let prepared = form.prepare(self.tags)?;
        let scheme = self.scheme;

        let plaintext = prepared.plaintext;
        let password = prepared.password;
        let payload = tokio::task::spawn_blocking(move || {
            encrypt_with(scheme, &plaintext, &password)
        })
        .await
        .map_err(|e| LockboxError::Encryption(format!("Encryption task failed: {}", e)))??;

        let mut record = NewRecord::new(payload, prepared.kind);
        record.user_tag = prepared.user_tag;

        let id = self.store.append(&record).await?;
        debug!(id = %id, kind = %record.kind, scheme = %scheme, "record saved");
        Ok(id)
    }

    /// Run [`Vault::encrypt_and_save`] and thread the form through it.
    pub async fn submit(&self, form: VaultForm) -> Submission {
        match self.encrypt_and_save(&form).await {
            Ok(id) => Submission {
                form: VaultForm::default(),
                result: Ok(id),
            },
            Err(err) => {
                debug!(error = %err, "save failed");
                Submission {
                    form,
                    result: Err(err),
                }
            }
        }
    }
}
