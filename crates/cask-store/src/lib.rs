//! Content-addressable blob storage for cask.
//!
//! This crate implements a digest-keyed blob store: content is written
//! once, named by the cryptographic digest of its own bytes, and retrieved
//! only by that digest. Small per-blob metadata records ride alongside the
//! content. It persists the immutable configuration and manifest blobs of
//! a container image subsystem.
//!
//! # Storage Backends
//!
//! All backends implement the [`StoreBackend`] trait:
//!
//! - [`FsStore`] — filesystem-backed store with an optional extra-storage
//!   fallback tier and lazy promotion via filesystem links
//! - [`MemoryStore`] — `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Blobs are immutable once written (content-addressing guarantees this).
//! 2. Every successful read re-hashes the bytes and verifies them against
//!    the requested digest; a mismatch is an integrity fault, not absence.
//! 3. One store-wide shared/exclusive lock: unlimited concurrent readers,
//!    fully serialized writers.
//! 4. A metadata entry may exist only for a digest with a readable blob.
//! 5. Configuration is injected at construction; the store reads no ambient
//!    state.
//! 6. All I/O errors are propagated with operation and path context, never
//!    silently ignored.

pub mod error;
pub mod fs;
pub mod keys;
pub mod layout;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsStore;
pub use memory::MemoryStore;
pub use traits::{DigestVisitor, GetOptions, StoreBackend};
