//! Hashcash Proof-of-Work Stamps
//!
//! Hashcash binds a costly-to-compute, cheap-to-verify SHA-256 partial
//! collision to a resource identifier such as an email address or URL.
//! Minting searches for a counter whose digest starts with the required
//! number of zero hex digits; verification re-parses the stamp, applies
//! the resource/difficulty/expiration policy and recomputes one digest.
//!
//! # Stamp formats
//!
//! ```text
//! 0:yymmdd:resource:suffix
//! 1:bits:yymmdd[hhmmss]:resource:ext:random:counter
//! ```
//!
//! # Example
//!
//! ```rust
//! use hashcash::{check, mint, MintOptions};
//!
//! let options = MintOptions { bits: 8, ..MintOptions::default() };
//! let stamp = mint("jane@example.com", &options).unwrap();
//!
//! assert!(check(&stamp, Some("jane@example.com"), 8, None).unwrap());
//! assert!(!check(&stamp, Some("mallory@example.com"), 8, None).unwrap());
//! ```
//!
//! Minting cost doubles per extra 4 bits of difficulty; verification stays
//! O(1). For high difficulties [`mint_parallel`] shards the counter space
//! across threads. Randomness, clock and digest provider can all be
//! injected through the `*_with` variants, which keeps minting
//! deterministic under test.

pub mod check;
pub mod digest;
pub mod mint;
pub mod salt;
pub mod stamp;

pub use check::{check, check_with, verify, verify_with, Verdict};
pub use digest::{DigestError, DigestProvider, Sha256Digest};
pub use mint::{
    hex_digits, meets_target, mint, mint_parallel, mint_parallel_with, mint_with, solve,
    MintError, MintOptions, Solution,
};
pub use salt::{salt, salt_with, SALT_ALPHABET};
pub use stamp::{ParseStampError, Stamp, StampDate, StampV0, StampV1};
