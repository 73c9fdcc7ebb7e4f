//! Digest provider boundary
//!
//! Minting and verification never hash bytes directly; they go through the
//! [`DigestProvider`] trait so the hash primitive stays an external
//! collaborator. The stock implementation is SHA-256 rendered as 64
//! lowercase hex characters.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Fault raised when the digest provider cannot process its input.
///
/// This is an environment fault, not a failed proof: minting aborts the
/// search and verification surfaces it as an `Err` instead of collapsing
/// it into a `false` result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    #[error("digest provider failed: {0}")]
    Unavailable(String),
}

/// Fixed-size digest over a candidate string, rendered as lowercase hex.
pub trait DigestProvider {
    /// Hash `input` and return the digest as lowercase hexadecimal text.
    fn hex_digest(&self, input: &str) -> Result<String, DigestError>;
}

/// SHA-256 digest provider backed by the `sha2` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl DigestProvider for Sha256Digest {
    fn hex_digest(&self, input: &str) -> Result<String, DigestError> {
        Ok(hex::encode(Sha256::digest(input.as_bytes())))
    }
}
