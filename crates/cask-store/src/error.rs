use std::io;
use std::path::PathBuf;

use cask_types::Digest;

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Empty input passed to `set`.
    #[error("refusing to store empty blob data")]
    EmptyData,

    /// The content file for a digest is absent.
    #[error("blob not found: {digest}")]
    BlobNotFound { digest: Digest },

    /// The metadata entry for (digest, key) is absent.
    #[error("metadata not found for {digest}: key {key:?}")]
    MetadataNotFound { digest: Digest, key: String },

    /// Bytes read from disk do not hash to the requested digest.
    ///
    /// Distinct from `BlobNotFound`: the file exists but its content is
    /// corrupt or tampered.
    #[error("integrity failure for {expected}: content hashes to {actual}")]
    IntegrityFailure { expected: Digest, actual: Digest },

    /// A metadata key that cannot be used as a file name.
    #[error("invalid metadata key {key:?}: {reason}")]
    InvalidMetadataKey { key: String, reason: String },

    /// Underlying filesystem failure, tagged with operation and path.
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Wrap an I/O error with the operation name and path it failed on.
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
