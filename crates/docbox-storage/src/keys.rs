//! Object key builder.
//!
//! Key format: `{documentType}/{relatedRecordId}/{uuid}{extension}`, with the
//! related-record segment omitted when absent and `documentType` defaulting
//! to `general`. The UUID makes keys unique regardless of inputs; segments
//! are validated here so caller-supplied values cannot inject extra path
//! components into the key.

use docbox_core::constants::DEFAULT_DOCUMENT_TYPE;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

const MAX_SEGMENT_LENGTH: usize = 128;
const MAX_EXTENSION_LENGTH: usize = 16;

/// Build a storage key for an uploaded file.
///
/// `original_name` is used only to carry the file extension over; a name
/// without a usable extension produces a bare-UUID tail.
pub fn build_object_key(
    document_type: Option<&str>,
    related_record_id: Option<&str>,
    original_name: &str,
) -> StorageResult<String> {
    let document_type = match document_type.map(str::trim) {
        Some(value) if !value.is_empty() => validate_segment("documentType", value)?,
        _ => DEFAULT_DOCUMENT_TYPE,
    };

    let related_record_id = match related_record_id.map(str::trim) {
        Some(value) if !value.is_empty() => Some(validate_segment("relatedRecordId", value)?),
        _ => None,
    };

    let unique_id = Uuid::new_v4();
    let tail = match file_extension(original_name) {
        Some(ext) => format!("{}.{}", unique_id, ext),
        None => unique_id.to_string(),
    };

    Ok(match related_record_id {
        Some(record_id) => format!("{}/{}/{}", document_type, record_id, tail),
        None => format!("{}/{}", document_type, tail),
    })
}

/// Reject values that would alter the key's path structure.
fn validate_segment<'a>(field: &str, value: &'a str) -> StorageResult<&'a str> {
    if value.len() > MAX_SEGMENT_LENGTH {
        return Err(StorageError::InvalidKey(format!(
            "{} exceeds {} characters",
            field, MAX_SEGMENT_LENGTH
        )));
    }
    if value.contains(['/', '\\']) || value.contains("..") {
        return Err(StorageError::InvalidKey(format!(
            "{} must not contain path separators or '..'",
            field
        )));
    }
    if value.chars().any(char::is_control) {
        return Err(StorageError::InvalidKey(format!(
            "{} must not contain control characters",
            field
        )));
    }
    Ok(value)
}

/// Extract a safe extension from a client-supplied filename, if any.
fn file_extension(name: &str) -> Option<&str> {
    // Only the final path component matters; browsers may send full paths.
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LENGTH
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn segments(key: &str) -> Vec<&str> {
        key.split('/').collect()
    }

    #[test]
    fn key_includes_type_record_and_extension() {
        let key = build_object_key(Some("passport"), Some("42"), "scan.pdf").unwrap();
        let parts = segments(&key);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "passport");
        assert_eq!(parts[1], "42");
        assert!(parts[2].ends_with(".pdf"));
        let uuid_part = parts[2].trim_end_matches(".pdf");
        assert!(Uuid::parse_str(uuid_part).is_ok());
    }

    #[test]
    fn related_record_segment_omitted_when_absent() {
        for related in [None, Some(""), Some("   ")] {
            let key = build_object_key(Some("visa"), related, "form.png").unwrap();
            let parts = segments(&key);
            assert_eq!(parts.len(), 2, "unexpected key shape: {}", key);
            assert_eq!(parts[0], "visa");
        }
    }

    #[test]
    fn document_type_defaults_to_general() {
        for doc_type in [None, Some(""), Some("  ")] {
            let key = build_object_key(doc_type, None, "file.txt").unwrap();
            assert!(key.starts_with("general/"), "key: {}", key);
        }
    }

    #[test]
    fn missing_extension_yields_bare_uuid_tail() {
        let key = build_object_key(Some("attestation"), None, "README").unwrap();
        let tail = segments(&key)[1];
        assert!(Uuid::parse_str(tail).is_ok());
    }

    #[test]
    fn extension_from_full_path_filename() {
        let key = build_object_key(Some("birth"), None, "C:\\Users\\me\\cert.jpg").unwrap();
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn malformed_extensions_are_dropped() {
        for name in ["file.", ".env", "archive.tar.gz extra?", "x.with space"] {
            let key = build_object_key(Some("general"), None, name).unwrap();
            let tail = segments(&key).last().unwrap().to_string();
            assert!(
                Uuid::parse_str(&tail).is_ok(),
                "expected bare uuid for {:?}, got {}",
                name,
                tail
            );
        }
    }

    #[test]
    fn path_injection_in_segments_is_rejected() {
        assert!(build_object_key(Some("a/b"), None, "f.pdf").is_err());
        assert!(build_object_key(Some("..%2f"), None, "f.pdf").is_err());
        assert!(build_object_key(Some("passport"), Some("../42"), "f.pdf").is_err());
        assert!(build_object_key(Some("pass\\port"), None, "f.pdf").is_err());
        assert!(build_object_key(Some("ty\npe"), None, "f.pdf").is_err());
    }

    #[test]
    fn oversized_segment_is_rejected() {
        let long = "a".repeat(MAX_SEGMENT_LENGTH + 1);
        assert!(build_object_key(Some(&long), None, "f.pdf").is_err());
    }

    #[test]
    fn identical_inputs_produce_distinct_keys() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let key = build_object_key(Some("passport"), Some("42"), "scan.pdf").unwrap();
            assert!(seen.insert(key), "duplicate key generated");
        }
    }
}
