//! Metadata key validation.
//!
//! Metadata keys become file names inside a per-digest directory. Keys that
//! could address anything outside that directory are rejected before any
//! filesystem call.
//!
//! Valid keys:
//! - Must be non-empty
//! - Must not contain `/`, `\`, NUL, or line/tab control characters
//! - Must not be `.` or `..`

use crate::error::{StoreError, StoreResult};

/// Characters that are forbidden anywhere in a metadata key.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0', '\n', '\r', '\t'];

/// Validate a metadata key, returning `Ok(())` if usable as a file name.
///
/// # Examples
///
/// ```
/// use cask_store::keys::validate_metadata_key;
///
/// assert!(validate_metadata_key("parent").is_ok());
/// assert!(validate_metadata_key("last-checked.json").is_ok());
/// assert!(validate_metadata_key("").is_err());
/// assert!(validate_metadata_key("a/b").is_err());
/// ```
pub fn validate_metadata_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidMetadataKey {
            key: key.to_string(),
            reason: "key must not be empty".into(),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if key.contains(*ch) {
            return Err(StoreError::InvalidMetadataKey {
                key: key.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    // `.` and `..` name the metadata directory itself or its parent.
    if key == "." || key == ".." {
        return Err(StoreError::InvalidMetadataKey {
            key: key.to_string(),
            reason: "reserved directory name".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(key: &str) -> bool {
        matches!(
            validate_metadata_key(key),
            Err(StoreError::InvalidMetadataKey { .. })
        )
    }

    #[test]
    fn accepts_plain_keys() {
        assert!(validate_metadata_key("parent").is_ok());
        assert!(validate_metadata_key("lastUpdated").is_ok());
        assert!(validate_metadata_key("checksum.v2").is_ok());
        assert!(validate_metadata_key("with space").is_ok());
    }

    #[test]
    fn rejects_empty_key() {
        assert!(rejected(""));
    }

    #[test]
    fn rejects_path_separators() {
        assert!(rejected("a/b"));
        assert!(rejected("a\\b"));
        assert!(rejected("/leading"));
    }

    #[test]
    fn rejects_control_characters() {
        assert!(rejected("a\nb"));
        assert!(rejected("a\0b"));
        assert!(rejected("a\tb"));
    }

    #[test]
    fn rejects_reserved_names() {
        assert!(rejected("."));
        assert!(rejected(".."));
    }

    #[test]
    fn dots_inside_keys_are_fine() {
        assert!(validate_metadata_key("a..b").is_ok());
        assert!(validate_metadata_key(".hidden").is_ok());
    }
}
