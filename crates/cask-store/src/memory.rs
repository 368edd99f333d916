use std::collections::HashMap;
use std::sync::RwLock;

use cask_types::Digest;

use crate::error::{StoreError, StoreResult};
use crate::keys::validate_metadata_key;
use crate::traits::{DigestVisitor, GetOptions, StoreBackend};

/// In-memory blob store for tests and embedding.
///
/// Mirrors the semantics of the filesystem backend (empty-input rejection,
/// metadata-requires-blob, cascading delete) without touching disk. There
/// is no secondary storage tier; `GetOptions::use_extra_storage` is
/// accepted and ignored. Data is held behind a `RwLock` for safe concurrent
/// access and cloned on read.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    blobs: HashMap<Digest, Vec<u8>>,
    metadata: HashMap<Digest, HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").blobs.len()
    }

    /// Returns `true` if no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").blobs.is_empty()
    }
}

impl StoreBackend for MemoryStore {
    fn walk(&self, visit: &mut DigestVisitor<'_>) -> StoreResult<()> {
        // Snapshot the keys so the visitor may call back into the store.
        let digests: Vec<Digest> = {
            let inner = self.inner.read().expect("lock poisoned");
            inner.blobs.keys().copied().collect()
        };
        for digest in &digests {
            visit(digest)?;
        }
        Ok(())
    }

    fn get(&self, digest: &Digest, _options: GetOptions) -> StoreResult<Vec<u8>> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .blobs
            .get(digest)
            .cloned()
            .ok_or(StoreError::BlobNotFound { digest: *digest })
    }

    fn set(&self, data: &[u8]) -> StoreResult<Digest> {
        if data.is_empty() {
            return Err(StoreError::EmptyData);
        }
        let digest = Digest::from_bytes(data);
        let mut inner = self.inner.write().expect("lock poisoned");
        // Idempotent: same bytes always map to the same digest.
        inner
            .blobs
            .entry(digest)
            .or_insert_with(|| data.to_vec());
        Ok(digest)
    }

    fn delete(&self, digest: &Digest) -> StoreResult<()> {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.metadata.remove(digest);
        inner
            .blobs
            .remove(digest)
            .map(|_| ())
            .ok_or(StoreError::BlobNotFound { digest: *digest })
    }

    fn set_metadata(&self, digest: &Digest, key: &str, data: &[u8]) -> StoreResult<()> {
        validate_metadata_key(key)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        if !inner.blobs.contains_key(digest) {
            return Err(StoreError::BlobNotFound { digest: *digest });
        }
        inner
            .metadata
            .entry(*digest)
            .or_default()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn get_metadata(&self, digest: &Digest, key: &str) -> StoreResult<Vec<u8>> {
        validate_metadata_key(key)?;
        let inner = self.inner.read().expect("lock poisoned");
        if !inner.blobs.contains_key(digest) {
            return Err(StoreError::BlobNotFound { digest: *digest });
        }
        inner
            .metadata
            .get(digest)
            .and_then(|entries| entries.get(key))
            .cloned()
            .ok_or_else(|| StoreError::MetadataNotFound {
                digest: *digest,
                key: key.to_string(),
            })
    }

    fn delete_metadata(&self, digest: &Digest, key: &str) -> StoreResult<()> {
        validate_metadata_key(key)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        if let Some(entries) = inner.metadata.get_mut(digest) {
            entries.remove(key);
        }
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("blob_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn set_then_get_roundtrip() {
        let store = MemoryStore::new();
        let digest = store.set(b"hello").unwrap();
        assert_eq!(store.get(&digest, GetOptions::default()).unwrap(), b"hello");
    }

    #[test]
    fn set_rejects_empty_data() {
        let store = MemoryStore::new();
        assert!(matches!(store.set(b"").unwrap_err(), StoreError::EmptyData));
        assert!(store.is_empty());
    }

    #[test]
    fn set_is_idempotent() {
        let store = MemoryStore::new();
        let d1 = store.set(b"dup").unwrap();
        let d2 = store.set(b"dup").unwrap();
        assert_eq!(d1, d2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_missing_blob_is_not_found() {
        let store = MemoryStore::new();
        let digest = Digest::from_bytes(b"missing");
        assert!(matches!(
            store.get(&digest, GetOptions::default()).unwrap_err(),
            StoreError::BlobNotFound { .. }
        ));
    }

    #[test]
    fn extra_storage_option_is_ignored() {
        let store = MemoryStore::new();
        let digest = store.set(b"tierless").unwrap();
        let options = GetOptions {
            use_extra_storage: true,
        };
        assert_eq!(store.get(&digest, options).unwrap(), b"tierless");
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_cascades_to_metadata() {
        let store = MemoryStore::new();
        let digest = store.set(b"blob").unwrap();
        store.set_metadata(&digest, "k", b"v").unwrap();

        store.delete(&digest).unwrap();
        assert!(matches!(
            store.get(&digest, GetOptions::default()).unwrap_err(),
            StoreError::BlobNotFound { .. }
        ));
        assert!(matches!(
            store.get_metadata(&digest, "k").unwrap_err(),
            StoreError::BlobNotFound { .. }
        ));
    }

    #[test]
    fn delete_missing_blob_fails() {
        let store = MemoryStore::new();
        let digest = Digest::from_bytes(b"missing");
        assert!(matches!(
            store.delete(&digest).unwrap_err(),
            StoreError::BlobNotFound { .. }
        ));
    }

    // -----------------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------------

    #[test]
    fn metadata_requires_blob() {
        let store = MemoryStore::new();
        let digest = Digest::from_bytes(b"missing");
        assert!(matches!(
            store.set_metadata(&digest, "k", b"v").unwrap_err(),
            StoreError::BlobNotFound { .. }
        ));
    }

    #[test]
    fn metadata_roundtrip_and_overwrite() {
        let store = MemoryStore::new();
        let digest = store.set(b"blob").unwrap();
        store.set_metadata(&digest, "k", b"first").unwrap();
        store.set_metadata(&digest, "k", b"second").unwrap();
        assert_eq!(store.get_metadata(&digest, "k").unwrap(), b"second");
    }

    #[test]
    fn delete_metadata_is_noop_when_absent() {
        let store = MemoryStore::new();
        let digest = store.set(b"blob").unwrap();
        store.delete_metadata(&digest, "never-set").unwrap();
    }

    #[test]
    fn invalid_keys_are_rejected() {
        let store = MemoryStore::new();
        let digest = store.set(b"blob").unwrap();
        assert!(matches!(
            store.set_metadata(&digest, "a/b", b"v").unwrap_err(),
            StoreError::InvalidMetadataKey { .. }
        ));
    }

    // -----------------------------------------------------------------------
    // Walk
    // -----------------------------------------------------------------------

    #[test]
    fn walk_visits_every_blob() {
        let store = MemoryStore::new();
        let d1 = store.set(b"one").unwrap();
        let d2 = store.set(b"two").unwrap();

        let mut seen = Vec::new();
        store
            .walk(&mut |digest: &Digest| {
                seen.push(*digest);
                Ok(())
            })
            .unwrap();

        seen.sort();
        let mut expected = vec![d1, d2];
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn walk_propagates_visitor_error() {
        let store = MemoryStore::new();
        store.set(b"one").unwrap();

        let err = store
            .walk(&mut |_digest: &Digest| Err(StoreError::EmptyData))
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptyData));
    }

    // -----------------------------------------------------------------------
    // Trait-object use
    // -----------------------------------------------------------------------

    #[test]
    fn usable_as_trait_object() {
        let store: Box<dyn StoreBackend> = Box::new(MemoryStore::new());
        let digest = store.set(b"dynamic dispatch").unwrap();
        assert_eq!(
            store.get(&digest, GetOptions::default()).unwrap(),
            b"dynamic dispatch"
        );
    }
}
