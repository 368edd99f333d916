//! Filesystem-backed blob store.
//!
//! Content files live at `<root>/content/<algorithm>/<hex>` and are
//! write-once: the digest is derived from the content, so overwriting a
//! path with different bytes would change its name. Metadata entries live
//! at `<root>/metadata/<algorithm>/<hex>/<key>`.
//!
//! An optional extra-storage root mirrors the content tree. When a read is
//! served from there, the primary root gains a filesystem link to the
//! extra-root file so later reads are local. The link is a reference, not
//! a copy.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use cask_types::{Algorithm, Digest};

use crate::error::{StoreError, StoreResult};
use crate::keys::validate_metadata_key;
use crate::layout;
use crate::traits::{DigestVisitor, GetOptions, StoreBackend};

/// Blob store rooted at a primary directory, optionally backed by a
/// secondary extra-storage directory.
///
/// One store-wide shared/exclusive lock serializes mutations against each
/// other and against all reads; readers run concurrently. Lock granularity
/// is coarse: a write to one digest blocks a concurrent read of any other.
/// The store assumes exclusive ownership of both roots; no other process
/// is expected to write into them while the store is open.
pub struct FsStore {
    root: PathBuf,
    extra_root: Option<PathBuf>,
    lock: RwLock<()>,
}

impl FsStore {
    /// Open a store at `root`, creating the canonical-algorithm content and
    /// metadata trees if needed.
    ///
    /// `extra_root` is an optional secondary storage area consulted as a
    /// fallback source of blobs. The store never creates or writes it; it
    /// is an externally mounted, read-only tier from the store's point of
    /// view.
    pub fn open(root: impl Into<PathBuf>, extra_root: Option<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        let content = layout::content_dir(&root, Algorithm::CANONICAL);
        fs::create_dir_all(&content).map_err(|e| StoreError::io("create_dir_all", &content, e))?;
        let metadata = layout::metadata_root(&root, Algorithm::CANONICAL);
        fs::create_dir_all(&metadata)
            .map_err(|e| StoreError::io("create_dir_all", &metadata, e))?;
        Ok(Self {
            root,
            extra_root,
            lock: RwLock::new(()),
        })
    }

    /// Primary root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Extra-storage root, if one was configured.
    pub fn extra_root(&self) -> Option<&Path> {
        self.extra_root.as_deref()
    }

    /// Read and verify a blob. The caller must hold the lock in either
    /// mode.
    fn read_verified(&self, digest: &Digest, options: GetOptions) -> StoreResult<Vec<u8>> {
        let mut content = None;

        if options.use_extra_storage {
            if let Some(extra_root) = &self.extra_root {
                let extra_path = layout::content_path(extra_root, digest);
                match fs::read(&extra_path) {
                    Ok(bytes) => {
                        self.promote(&extra_path, digest)?;
                        content = Some(bytes);
                    }
                    Err(e) => {
                        // Any secondary failure falls back to the primary root.
                        debug!(digest = %digest, error = %e, "extra-storage read failed; falling back");
                    }
                }
            }
        }

        let content = match content {
            Some(bytes) => bytes,
            None => {
                let path = layout::content_path(&self.root, digest);
                fs::read(&path).map_err(|e| match e.kind() {
                    io::ErrorKind::NotFound => StoreError::BlobNotFound { digest: *digest },
                    _ => StoreError::io("read", &path, e),
                })?
            }
        };

        let actual = Digest::from_bytes(&content);
        if actual != *digest {
            return Err(StoreError::IntegrityFailure {
                expected: *digest,
                actual,
            });
        }

        Ok(content)
    }

    /// Link an extra-root content file into the primary content tree so
    /// later reads are served locally.
    ///
    /// Idempotent: an existing primary entry is success, whether it was
    /// there all along or a concurrent promotion won the race. Promotion is
    /// best-effort maintenance of the "primary serves everything seen"
    /// invariant; any other link failure fails the surrounding `get`.
    fn promote(&self, extra_path: &Path, digest: &Digest) -> StoreResult<()> {
        let primary_path = layout::content_path(&self.root, digest);
        match primary_path.symlink_metadata() {
            Ok(_) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io("stat", &primary_path, e)),
        }
        match make_link(extra_path, &primary_path) {
            Ok(()) => {
                debug!(digest = %digest, "promoted blob from extra storage");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(StoreError::io("link", &primary_path, e)),
        }
    }

    /// Publish `data` at `path` via a temp file in the same directory and
    /// an atomic rename, so a concurrent reader never observes a partially
    /// written file.
    fn write_atomic(path: &Path, data: &[u8]) -> StoreResult<()> {
        let dir = path.parent().expect("store paths always have a parent");
        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io("create", dir, e))?;
        tmp.write_all(data)
            .map_err(|e| StoreError::io("write", path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io("sync", path, e))?;
        tmp.persist(path)
            .map_err(|e| StoreError::io("rename", path, e.error))?;
        Ok(())
    }
}

#[cfg(unix)]
fn make_link(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(not(unix))]
fn make_link(original: &Path, link: &Path) -> io::Result<()> {
    fs::hard_link(original, link)
}

impl StoreBackend for FsStore {
    fn walk(&self, visit: &mut DigestVisitor<'_>) -> StoreResult<()> {
        // Snapshot the listing under the shared lock, then visit without
        // it so the visitor itself may call back into the store.
        let content_dir = layout::content_dir(&self.root, Algorithm::CANONICAL);
        let mut names = Vec::new();
        {
            let _guard = self.lock.read().expect("lock poisoned");
            let entries = fs::read_dir(&content_dir)
                .map_err(|e| StoreError::io("read_dir", &content_dir, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| StoreError::io("read_dir", &content_dir, e))?;
                names.push(entry.file_name());
            }
        }

        for name in names {
            let name = name.to_string_lossy();
            match Digest::from_hex(Algorithm::CANONICAL, &name) {
                Ok(digest) => visit(&digest)?,
                Err(e) => {
                    debug!(entry = %name, error = %e, "skipping malformed content entry");
                }
            }
        }
        Ok(())
    }

    fn get(&self, digest: &Digest, options: GetOptions) -> StoreResult<Vec<u8>> {
        let _guard = self.lock.read().expect("lock poisoned");
        self.read_verified(digest, options)
    }

    fn set(&self, data: &[u8]) -> StoreResult<Digest> {
        let _guard = self.lock.write().expect("lock poisoned");

        if data.is_empty() {
            return Err(StoreError::EmptyData);
        }

        let digest = Digest::from_bytes(data);
        Self::write_atomic(&layout::content_path(&self.root, &digest), data)?;

        debug!(digest = %digest, len = data.len(), "stored blob");
        Ok(digest)
    }

    fn delete(&self, digest: &Digest) -> StoreResult<()> {
        let _guard = self.lock.write().expect("lock poisoned");

        let meta_dir = layout::metadata_dir(&self.root, digest);
        match fs::remove_dir_all(&meta_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io("remove_dir_all", &meta_dir, e)),
        }

        let content_path = layout::content_path(&self.root, digest);
        fs::remove_file(&content_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::BlobNotFound { digest: *digest },
            _ => StoreError::io("remove_file", &content_path, e),
        })
    }

    fn set_metadata(&self, digest: &Digest, key: &str, data: &[u8]) -> StoreResult<()> {
        validate_metadata_key(key)?;
        let _guard = self.lock.write().expect("lock poisoned");

        // Metadata may only be attached to a readable, intact blob.
        self.read_verified(digest, GetOptions::default())?;

        let dir = layout::metadata_dir(&self.root, digest);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io("create_dir_all", &dir, e))?;
        Self::write_atomic(&layout::metadata_path(&self.root, digest, key), data)
    }

    fn get_metadata(&self, digest: &Digest, key: &str) -> StoreResult<Vec<u8>> {
        validate_metadata_key(key)?;
        let _guard = self.lock.read().expect("lock poisoned");

        self.read_verified(digest, GetOptions::default())?;

        let path = layout::metadata_path(&self.root, digest, key);
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::MetadataNotFound {
                digest: *digest,
                key: key.to_string(),
            },
            _ => StoreError::io("read", &path, e),
        })
    }

    fn delete_metadata(&self, digest: &Digest, key: &str) -> StoreResult<()> {
        validate_metadata_key(key)?;
        let _guard = self.lock.write().expect("lock poisoned");

        let path = layout::metadata_path(&self.root, digest, key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io("remove_file", &path, e)),
        }
    }
}

impl std::fmt::Debug for FsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsStore")
            .field("root", &self.root)
            .field("extra_root", &self.extra_root)
            .finish()
    }
}
