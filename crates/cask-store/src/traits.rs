//! The [`StoreBackend`] trait defining the blob store interface.
//!
//! Any backend (filesystem, in-memory) implements this trait to provide
//! digest-keyed blob persistence with per-blob metadata records.

use cask_types::Digest;

use crate::error::StoreResult;

/// Options for [`StoreBackend::get`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Consult the extra-storage root as a fallback source of blobs.
    pub use_extra_storage: bool,
}

/// Visitor invoked by [`StoreBackend::walk`] once per stored digest.
pub type DigestVisitor<'a> = dyn FnMut(&Digest) -> StoreResult<()> + 'a;

/// Digest-keyed blob store with per-blob metadata records.
///
/// All implementations must satisfy these invariants:
/// - A retrievable blob always hashes to its own digest; a mismatch is an
///   integrity fault, never a missing-data fault.
/// - Writes are idempotent: storing the same bytes twice yields the same
///   digest and leaves the first copy intact.
/// - A metadata entry may exist only for a digest with a readable blob.
/// - Every operation is atomic with respect to the backend's internal lock.
/// - All I/O errors are propagated, never silently ignored.
pub trait StoreBackend: Send + Sync {
    /// Call `visit` once per digest present in the primary content area.
    ///
    /// Enumeration order is directory-listing order and is not guaranteed
    /// sorted. The first error returned by `visit` aborts the walk and is
    /// returned to the caller unmodified. Entries whose name is not a valid
    /// canonical-algorithm payload are skipped with a diagnostic, never
    /// reported.
    fn walk(&self, visit: &mut DigestVisitor<'_>) -> StoreResult<()>;

    /// Return the exact bytes stored under `digest`.
    ///
    /// `options` selects whether the extra-storage root may be consulted.
    /// The returned bytes have been re-hashed and verified against the
    /// requested digest.
    fn get(&self, digest: &Digest, options: GetOptions) -> StoreResult<Vec<u8>>;

    /// Store `data` under its own digest and return that digest.
    ///
    /// Fails on empty input. Storing the same bytes twice is safe and
    /// yields the same digest.
    fn set(&self, data: &[u8]) -> StoreResult<Digest>;

    /// Remove the blob's metadata directory, then its content file.
    ///
    /// Fails if the content file does not exist, even when metadata removal
    /// succeeded. Metadata removal failure aborts before the content file
    /// is touched.
    fn delete(&self, digest: &Digest) -> StoreResult<()>;

    /// Write `data` under `key` for an existing blob, overwriting any prior
    /// value.
    ///
    /// Fails if the blob does not exist; existence is verified by a full
    /// read including the integrity check.
    fn set_metadata(&self, digest: &Digest, key: &str, data: &[u8]) -> StoreResult<()>;

    /// Read the metadata value stored under `key` for an existing blob.
    ///
    /// Fails if the blob does not exist or the key has no entry.
    fn get_metadata(&self, digest: &Digest, key: &str) -> StoreResult<Vec<u8>>;

    /// Remove the metadata entry for `key` if present; absence is a no-op.
    fn delete_metadata(&self, digest: &Digest, key: &str) -> StoreResult<()>;
}
