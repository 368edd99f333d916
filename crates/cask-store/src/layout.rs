//! On-disk layout of a store root.
//!
//! ```text
//! <root>/content/<algorithm>/<hex>         blob bytes
//! <root>/metadata/<algorithm>/<hex>/<key>  metadata value
//! ```
//!
//! Pure path arithmetic; no I/O happens here. `root` is chosen per call as
//! either the primary root or the extra-storage root.

use std::path::{Path, PathBuf};

use cask_types::{Algorithm, Digest};

const CONTENT_DIR: &str = "content";
const METADATA_DIR: &str = "metadata";

/// Directory holding all content files for one algorithm.
pub fn content_dir(root: &Path, algorithm: Algorithm) -> PathBuf {
    root.join(CONTENT_DIR).join(algorithm.as_str())
}

/// Directory holding all per-digest metadata directories for one algorithm.
pub fn metadata_root(root: &Path, algorithm: Algorithm) -> PathBuf {
    root.join(METADATA_DIR).join(algorithm.as_str())
}

/// Path of the content file for a digest under `root`.
pub fn content_path(root: &Path, digest: &Digest) -> PathBuf {
    content_dir(root, digest.algorithm()).join(digest.hex())
}

/// Per-digest metadata directory under `root`.
pub fn metadata_dir(root: &Path, digest: &Digest) -> PathBuf {
    metadata_root(root, digest.algorithm()).join(digest.hex())
}

/// Path of a single metadata entry.
pub fn metadata_path(root: &Path, digest: &Digest, key: &str) -> PathBuf {
    metadata_dir(root, digest).join(key)
}
