use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DigestError;

/// Number of hex characters in a digest payload.
pub const HEX_LEN: usize = 64;

/// Digest algorithms understood by the store.
///
/// Exactly one algorithm is canonical. The on-disk layout and the walker
/// only ever touch the canonical algorithm's subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Algorithm {
    /// BLAKE3 with a 32-byte output.
    Blake3,
}

impl Algorithm {
    /// The algorithm used for all newly stored content.
    pub const CANONICAL: Self = Self::Blake3;

    /// Name used as the on-disk directory segment and string-form prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blake3 => "blake3",
        }
    }

    /// Parse an algorithm name.
    pub fn parse(s: &str) -> Result<Self, DigestError> {
        match s {
            "blake3" => Ok(Self::Blake3),
            other => Err(DigestError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content-addressed identity for a stored blob.
///
/// A `Digest` pairs an algorithm tag with the hash of the blob's bytes.
/// Identical content always produces the same digest, making blobs
/// deduplicatable and verifiable. Two digests are equal iff both the
/// algorithm and the payload match.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest {
    algorithm: Algorithm,
    bytes: [u8; 32],
}

impl Digest {
    /// Compute the canonical-algorithm digest of raw bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            algorithm: Algorithm::CANONICAL,
            bytes: *blake3::hash(data).as_bytes(),
        }
    }

    /// Create a digest from a pre-computed hash.
    pub fn from_hash(algorithm: Algorithm, hash: [u8; 32]) -> Self {
        Self {
            algorithm,
            bytes: hash,
        }
    }

    /// Reconstruct a digest from an algorithm and its hex payload.
    ///
    /// The payload must be exactly [`HEX_LEN`] lowercase hex characters.
    /// Anything else (wrong length, uppercase, non-hex bytes) is rejected
    /// here so that every constructed `Digest` is well-formed.
    pub fn from_hex(algorithm: Algorithm, hex_payload: &str) -> Result<Self, DigestError> {
        if hex_payload.len() != HEX_LEN {
            return Err(DigestError::InvalidLength {
                expected: HEX_LEN,
                actual: hex_payload.len(),
            });
        }
        if !hex_payload
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(DigestError::InvalidHex(hex_payload.to_string()));
        }
        let raw = hex::decode(hex_payload).map_err(|e| DigestError::InvalidHex(e.to_string()))?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&raw);
        Ok(Self { algorithm, bytes })
    }

    /// Parse the canonical `<algorithm>:<hex>` string form.
    pub fn parse(s: &str) -> Result<Self, DigestError> {
        let (algorithm, hex_payload) = s
            .split_once(':')
            .ok_or_else(|| DigestError::MissingSeparator(s.to_string()))?;
        Self::from_hex(Algorithm::parse(algorithm)?, hex_payload)
    }

    /// The algorithm this digest was computed with.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The raw 32-byte payload.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Hex-encoded payload (64 lowercase characters).
    pub fn hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Short hex form for logs (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.bytes[..4])
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}:{})", self.algorithm, self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex())
    }
}

impl FromStr for Digest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_bytes_is_deterministic() {
        let data = b"hello world";
        let d1 = Digest::from_bytes(data);
        let d2 = Digest::from_bytes(data);
        assert_eq!(d1, d2);
    }

    #[test]
    fn different_data_produces_different_digests() {
        let d1 = Digest::from_bytes(b"hello");
        let d2 = Digest::from_bytes(b"world");
        assert_ne!(d1, d2);
    }

    #[test]
    fn from_bytes_uses_canonical_algorithm() {
        let digest = Digest::from_bytes(b"content");
        assert_eq!(digest.algorithm(), Algorithm::CANONICAL);
    }

    #[test]
    fn hex_roundtrip() {
        let digest = Digest::from_bytes(b"test");
        let parsed = Digest::from_hex(digest.algorithm(), &digest.hex()).unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn parse_display_roundtrip() {
        let digest = Digest::from_bytes(b"roundtrip");
        let parsed = Digest::parse(&digest.to_string()).unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn from_str_matches_parse() {
        let digest = Digest::from_bytes(b"fromstr");
        let parsed: Digest = digest.to_string().parse().unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = Digest::from_hex(Algorithm::Blake3, "abc123").unwrap_err();
        assert_eq!(
            err,
            DigestError::InvalidLength {
                expected: HEX_LEN,
                actual: 6
            }
        );
    }

    #[test]
    fn rejects_uppercase_hex() {
        let upper = "A".repeat(HEX_LEN);
        let err = Digest::from_hex(Algorithm::Blake3, &upper).unwrap_err();
        assert!(matches!(err, DigestError::InvalidHex(_)));
    }

    #[test]
    fn rejects_non_hex_characters() {
        let bad = "z".repeat(HEX_LEN);
        let err = Digest::from_hex(Algorithm::Blake3, &bad).unwrap_err();
        assert!(matches!(err, DigestError::InvalidHex(_)));
    }

    #[test]
    fn rejects_unknown_algorithm() {
        let hex = "a".repeat(HEX_LEN);
        let err = Digest::parse(&format!("sha999:{hex}")).unwrap_err();
        assert!(matches!(err, DigestError::UnknownAlgorithm(_)));
    }

    #[test]
    fn rejects_missing_separator() {
        let err = Digest::parse(&"a".repeat(HEX_LEN)).unwrap_err();
        assert!(matches!(err, DigestError::MissingSeparator(_)));
    }

    #[test]
    fn display_carries_algorithm_prefix() {
        let digest = Digest::from_bytes(b"display");
        let rendered = digest.to_string();
        assert!(rendered.starts_with("blake3:"));
        assert_eq!(rendered.len(), "blake3:".len() + HEX_LEN);
    }

    #[test]
    fn short_hex_is_8_chars() {
        let digest = Digest::from_bytes(b"short");
        assert_eq!(digest.short_hex().len(), 8);
    }

    #[test]
    fn serde_roundtrip() {
        let digest = Digest::from_bytes(b"serde test");
        let json = serde_json::to_string(&digest).unwrap();
        let parsed: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn algorithm_name_roundtrip() {
        let algorithm = Algorithm::CANONICAL;
        assert_eq!(Algorithm::parse(algorithm.as_str()).unwrap(), algorithm);
    }

    proptest! {
        #[test]
        fn arbitrary_payload_roundtrips(hash in proptest::array::uniform32(any::<u8>())) {
            let digest = Digest::from_hash(Algorithm::CANONICAL, hash);
            let parsed = Digest::parse(&digest.to_string()).unwrap();
            prop_assert_eq!(digest, parsed);
        }
    }
}
