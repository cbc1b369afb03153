//! Save form state and its validation gate.
//!
//! A [`VaultForm`] is an immutable snapshot of what the user entered. It is
//! threaded through validation and the save operation; nothing here is
//! ambient or shared.

use zeroize::Zeroizing;

use crate::codec::{check_file_size, encode_file};
use crate::crypto::validate_password;
use crate::error::{Result, ValidationError};
use crate::record::{normalize_tag, RecordKind};

/// Whether a save must carry a user tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagPolicy {
    #[default]
    Required,
    Optional,
}

/// A selected file, already checked against the size ceiling.
#[derive(Clone)]
pub struct Attachment {
    name: String,
    mime_type: String,
    bytes: Zeroizing<Vec<u8>>,
}

impl Attachment {
    /// Accept a selected file.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::PayloadTooLarge` if `bytes` exceeds the
    /// ceiling; nothing is encoded in that case.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> std::result::Result<Self, ValidationError> {
        let bytes = Zeroizing::new(bytes);
        check_file_size(bytes.len())?;
        Ok(Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Everything the user entered for one save.
#[derive(Clone, Default)]
pub struct VaultForm {
    text: Zeroizing<String>,
    password: Zeroizing<String>,
    tag: String,
    attachment: Option<Attachment>,
}

impl VaultForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Zeroizing::new(text.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Zeroizing::new(password.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// True when every field is empty.
    pub fn is_cleared(&self) -> bool {
        self.text.is_empty()
            && self.password.is_empty()
            && self.tag.is_empty()
            && self.attachment.is_none()
    }

    /// Check the save preconditions in order; the first failure wins.
    ///
    /// 1. password present
    /// 2. text or attachment present
    /// 3. tag present (when required)
    /// 4. password satisfies the policy
    pub fn validate(&self, tags: TagPolicy) -> std::result::Result<(), ValidationError> {
        if self.password.is_empty() {
            return Err(ValidationError::MissingPassword);
        }
        if self.text.is_empty() && self.attachment.is_none() {
            return Err(ValidationError::MissingContent);
        }
        if tags == TagPolicy::Required && normalize_tag(&self.tag).is_empty() {
            return Err(ValidationError::MissingTag);
        }
        validate_password(&self.password)
    }

    /// Validate and pick what gets encrypted.
    ///
    /// An attachment takes precedence over the text note.
    pub fn prepare(&self, tags: TagPolicy) -> Result<PreparedSave> {
        self.validate(tags)?;

        let (plaintext, kind) = match &self.attachment {
            Some(file) => (
                encode_file(&file.bytes, &file.mime_type)?,
                RecordKind::File,
            ),
            None => (self.text.as_str().to_owned(), RecordKind::Text),
        };

        let tag = normalize_tag(&self.tag);
        Ok(PreparedSave {
            plaintext: Zeroizing::new(plaintext),
            password: self.password.clone(),
            kind,
            user_tag: (!tag.is_empty()).then_some(tag),
        })
    }
}

impl std::fmt::Debug for VaultForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultForm")
            .field("text", &format!("[{} bytes]", self.text.len()))
            .field("password", &"[REDACTED]")
            .field("tag", &self.tag)
            .field("attachment", &self.attachment)
            .finish()
    }
}

/// A validated save, ready for the cipher.
pub struct PreparedSave {
    pub plaintext: Zeroizing<String>,
    pub password: Zeroizing<String>,
    pub kind: RecordKind,
    pub user_tag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MAX_FILE_BYTES;

    fn filled() -> VaultForm {
        VaultForm::new()
            .with_text("hello")
            .with_password("abc123!")
            .with_tag("Bob")
    }

    #[test]
    fn test_valid_form() {
        assert!(filled().validate(TagPolicy::Required).is_ok());
    }

    #[test]
    fn test_precondition_order() {
        // Everything missing: password is reported first
        assert_eq!(
            VaultForm::new().validate(TagPolicy::Required),
            Err(ValidationError::MissingPassword)
        );
        // Weak password but no content: content is reported first
        assert_eq!(
            VaultForm::new()
                .with_password("weak")
                .validate(TagPolicy::Required),
            Err(ValidationError::MissingContent)
        );
        // Weak password and no tag: tag is reported first
        assert_eq!(
            VaultForm::new()
                .with_password("weak")
                .with_text("x")
                .validate(TagPolicy::Required),
            Err(ValidationError::MissingTag)
        );
        assert_eq!(
            filled().with_password("weak").validate(TagPolicy::Required),
            Err(ValidationError::WeakPassword)
        );
    }

    #[test]
    fn test_blank_tag_is_missing() {
        assert_eq!(
            filled().with_tag("   ").validate(TagPolicy::Required),
            Err(ValidationError::MissingTag)
        );
        assert!(filled().with_tag("").validate(TagPolicy::Optional).is_ok());
    }

    #[test]
    fn test_prepare_text() {
        let prepared = filled().prepare(TagPolicy::Required).unwrap();
        assert_eq!(prepared.plaintext.as_str(), "hello");
        assert_eq!(prepared.kind, RecordKind::Text);
        assert_eq!(prepared.user_tag.as_deref(), Some("bob"));
    }

    #[test]
    fn test_attachment_wins_over_text() {
        let file = Attachment::new("hi.txt", "text/plain", b"hi".to_vec()).unwrap();
        let prepared = filled()
            .with_attachment(file)
            .prepare(TagPolicy::Required)
            .unwrap();
        assert_eq!(prepared.kind, RecordKind::File);
        assert_eq!(prepared.plaintext.as_str(), "data:text/plain;base64,aGk=");
    }

    #[test]
    fn test_attachment_without_text_is_content() {
        let file = Attachment::new("a.bin", "", vec![1, 2, 3]).unwrap();
        let form = VaultForm::new()
            .with_password("abc123!")
            .with_tag("bob")
            .with_attachment(file);
        assert!(form.validate(TagPolicy::Required).is_ok());
    }

    #[test]
    fn test_oversized_attachment_rejected_at_selection() {
        let err = Attachment::new("big.bin", "", vec![0u8; 2 * 1024 * 1024]).unwrap_err();
        assert!(matches!(err, ValidationError::PayloadTooLarge { .. }));

        assert!(Attachment::new("edge.bin", "", vec![0u8; MAX_FILE_BYTES]).is_ok());
    }

    #[test]
    fn test_untagged_prepare() {
        let prepared = filled()
            .with_tag("  ")
            .prepare(TagPolicy::Optional)
            .unwrap();
        assert!(prepared.user_tag.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug_output = format!("{:?}", filled());
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("abc123!"));
        assert!(!debug_output.contains("hello"));
    }

    #[test]
    fn test_default_form_is_cleared() {
        assert!(VaultForm::new().is_cleared());
        assert!(!filled().is_cleared());
    }
}
