//! Digest identity types for the cask blob store.
//!
//! A [`Digest`] is the algorithm-tagged cryptographic hash of a blob's
//! bytes. It doubles as the blob's storage key: content is written once,
//! named by its own digest, and retrieved only by that digest. Everything
//! else in cask depends on this crate.
//!
//! # Key Types
//!
//! - [`Algorithm`] — digest algorithm tag; exactly one algorithm is
//!   canonical and the on-disk layout only ever uses its subtree
//! - [`Digest`] — content-addressed identity = (algorithm, 32-byte payload)
//! - [`DigestError`] — parse and validation failures

pub mod digest;
pub mod error;

pub use digest::{Algorithm, Digest};
pub use error::DigestError;
