use thiserror::Error;

/// Errors produced when parsing or constructing digests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error("invalid hex payload: {0}")]
    InvalidHex(String),

    #[error("invalid payload length: expected {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("missing `algorithm:hex` separator in {0:?}")]
    MissingSeparator(String),
}
