//! Vault record data model.
//!
//! Field names on the wire follow the store's document contract:
//! `payload`, `type`, `userTag`, `timestamp`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LockboxError;

/// Store-assigned record identifier. Opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the writer said the payload holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[default]
    Text,
    File,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Text => "text",
            RecordKind::File => "file",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = LockboxError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(RecordKind::Text),
            "file" => Ok(RecordKind::File),
            other => Err(LockboxError::Storage(format!(
                "Unknown record type: {}",
                other
            ))),
        }
    }
}

/// A persisted encrypted note or file.
///
/// Never mutated after creation. `timestamp` is `None` only in an optimistic
/// local view before the store has confirmed the write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultRecord {
    pub id: RecordId,

    /// Ciphertext; only the cipher engine looks inside.
    pub payload: String,

    /// Writer-supplied type. Not trusted on read.
    #[serde(rename = "type", default)]
    pub kind: RecordKind,

    /// Normalized owner label for client-side filtering. Not a security boundary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_tag: Option<String>,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl VaultRecord {
    /// Timestamp for display, or "pending" until the store confirms it.
    pub fn timestamp_label(&self) -> String {
        match self.timestamp {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => "pending".to_string(),
        }
    }

    /// The record's tag, or the empty string when untagged.
    pub fn tag(&self) -> &str {
        self.user_tag.as_deref().unwrap_or_default()
    }
}

/// Builder for a record about to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub payload: String,
    pub kind: RecordKind,
    pub user_tag: Option<String>,
}

impl NewRecord {
    pub fn new(payload: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            payload: payload.into(),
            kind,
            user_tag: None,
        }
    }

    /// Attach a tag; it is normalized and dropped if blank.
    pub fn with_tag(mut self, tag: &str) -> Self {
        let normalized = normalize_tag(tag);
        self.user_tag = if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        };
        self
    }
}

/// Lower-case and trim a tag or search term.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}
