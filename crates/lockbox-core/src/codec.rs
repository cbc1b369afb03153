//! File payload codec.
//!
//! Attached files are carried through the cipher as RFC 2397 data URLs
//! (`data:<mime>;base64,<body>`). The `data:` prefix is what distinguishes a
//! file payload from a plain text note after decryption, so no separate type
//! flag has to be trusted.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{LockboxError, Result, ValidationError};

/// Hard ceiling on the size of a source file, checked before encoding.
pub const MAX_FILE_BYTES: usize = 1_048_576;

/// Literal prefix of every encoded file payload.
pub const DATA_URL_PREFIX: &str = "data:";

/// MIME type recorded when the caller does not know one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

const BASE64_MARKER: &str = ";base64";

/// A file recovered from its encoded representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Reject files larger than [`MAX_FILE_BYTES`].
pub fn check_file_size(size: usize) -> std::result::Result<(), ValidationError> {
    if size > MAX_FILE_BYTES {
        return Err(ValidationError::PayloadTooLarge {
            size,
            limit: MAX_FILE_BYTES,
        });
    }
    Ok(())
}

/// Encode file bytes as a base64 data URL.
///
/// # Errors
///
/// Returns `ValidationError::PayloadTooLarge` when `bytes` exceeds
/// [`MAX_FILE_BYTES`]; the caller must not go on to encrypt. Returns
/// `LockboxError::InvalidInput` if the MIME type contains a comma.
///
/// # Examples
///
/// ```
/// use lockbox_core::codec::{decode_file, encode_file};
///
/// let encoded = encode_file(b"hi", "text/plain").unwrap();
/// assert_eq!(encoded, "data:text/plain;base64,aGk=");
/// assert_eq!(decode_file(&encoded).unwrap().bytes, b"hi");
/// ```
pub fn encode_file(bytes: &[u8], mime_type: &str) -> Result<String> {
    check_file_size(bytes.len())?;

    let mime_type = mime_type.trim();
    if mime_type.contains(',') {
        return Err(LockboxError::InvalidInput(format!(
            "Invalid MIME type: {}",
            mime_type
        )));
    }
    let mime_type = if mime_type.is_empty() {
        DEFAULT_MIME_TYPE
    } else {
        mime_type
    };

    Ok(format!(
        "{}{}{},{}",
        DATA_URL_PREFIX,
        mime_type,
        BASE64_MARKER,
        STANDARD.encode(bytes)
    ))
}

/// True iff `text` is an encoded file payload.
pub fn is_encoded_file(text: &str) -> bool {
    text.starts_with(DATA_URL_PREFIX)
}

/// Decode a data URL back into bytes and MIME type.
///
/// Accepts both base64 and percent-encoded bodies.
pub fn decode_file(text: &str) -> Result<DecodedFile> {
    let rest = text.strip_prefix(DATA_URL_PREFIX).ok_or_else(|| {
        LockboxError::InvalidInput("Payload is not an encoded file".to_string())
    })?;
    let (header, body) = rest.split_once(',').ok_or_else(|| {
        LockboxError::InvalidInput("Encoded file is missing its data separator".to_string())
    })?;

    let (mime_type, bytes) = match header.strip_suffix(BASE64_MARKER) {
        Some(mime_type) => {
            let bytes = STANDARD.decode(body.trim()).map_err(|e| {
                LockboxError::InvalidInput(format!("Encoded file body is not base64: {}", e))
            })?;
            (mime_type, bytes)
        }
        None => (header, percent_decode(body)?),
    };

    let mime_type = if mime_type.trim().is_empty() {
        DEFAULT_MIME_TYPE.to_string()
    } else {
        mime_type.trim().to_string()
    };

    Ok(DecodedFile { bytes, mime_type })
}

fn percent_decode(body: &str) -> Result<Vec<u8>> {
    let raw = body.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let hex = raw
                .get(i + 1..i + 3)
                .and_then(|pair| std::str::from_utf8(pair).ok())
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| {
                    LockboxError::InvalidInput("Invalid percent escape in encoded file".to_string())
                })?;
            out.push(hex);
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// File extension for a MIME type, without the dot.
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let ext = match essence.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "application/pdf" => "pdf",
        "application/json" => "json",
        "application/zip" => "zip",
        "text/plain" => "txt",
        "text/csv" => "csv",
        "text/html" => "html",
        _ => return None,
    };
    Some(ext)
}

/// Guess a MIME type from a file name's extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "zip" => "application/zip",
        "txt" | "md" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        _ => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        let encoded = encode_file(&bytes, "image/png").unwrap();
        assert!(is_encoded_file(&encoded));

        let decoded = decode_file(&encoded).unwrap();
        assert_eq!(decoded.bytes, bytes);
        assert_eq!(decoded.mime_type, "image/png");
    }

    #[test]
    fn test_size_boundary() {
        let exact = vec![0u8; MAX_FILE_BYTES];
        assert!(encode_file(&exact, "application/pdf").is_ok());

        let over = vec![0u8; MAX_FILE_BYTES + 1];
        let err = encode_file(&over, "application/pdf").unwrap_err();
        assert!(matches!(
            err,
            LockboxError::Validation(ValidationError::PayloadTooLarge {
                size,
                limit: MAX_FILE_BYTES,
            }) if size == MAX_FILE_BYTES + 1
        ));
    }

    #[test]
    fn test_empty_mime_defaults() {
        let encoded = encode_file(b"abc", "").unwrap();
        assert!(encoded.starts_with("data:application/octet-stream;base64,"));
        assert_eq!(decode_file(&encoded).unwrap().mime_type, DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_mime_with_comma_rejected() {
        assert!(matches!(
            encode_file(b"abc", "text/plain,evil"),
            Err(LockboxError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_file_encodes() {
        let encoded = encode_file(b"", "text/plain").unwrap();
        assert_eq!(encoded, "data:text/plain;base64,");
        assert!(decode_file(&encoded).unwrap().bytes.is_empty());
    }

    #[test]
    fn test_is_encoded_file() {
        assert!(is_encoded_file("data:image/png;base64,AAAA"));
        assert!(!is_encoded_file("hello"));
        assert!(!is_encoded_file(" data:image/png;base64,AAAA"));
        assert!(!is_encoded_file("DATA:image/png;base64,AAAA"));
    }

    #[test]
    fn test_decode_percent_encoded() {
        let decoded = decode_file("data:text/plain,hello%20world").unwrap();
        assert_eq!(decoded.bytes, b"hello world");
        assert_eq!(decoded.mime_type, "text/plain");
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode_file("hello").is_err());
        assert!(decode_file("data:text/plain;base64").is_err());
        assert!(decode_file("data:text/plain;base64,!!!").is_err());
        assert!(decode_file("data:text/plain,bad%zzescape").is_err());
        assert!(decode_file("data:text/plain,trailing%2").is_err());
    }

    #[test]
    fn test_mime_parameters_survive() {
        let encoded = encode_file(b"x", "text/plain;charset=utf-8").unwrap();
        let decoded = decode_file(&encoded).unwrap();
        assert_eq!(decoded.mime_type, "text/plain;charset=utf-8");
        assert_eq!(extension_for_mime(&decoded.mime_type), Some("txt"));
    }

    #[test]
    fn test_extension_lookup() {
        assert_eq!(extension_for_mime("image/JPEG"), Some("jpg"));
        assert_eq!(extension_for_mime("application/pdf"), Some("pdf"));
        assert_eq!(extension_for_mime("application/x-unknown"), None);
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("scan.PDF")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("noext")), DEFAULT_MIME_TYPE);
    }
}
