//! Random salt generation
//!
//! The salt is the uniqueness component of a minted challenge: it prevents
//! precomputed solutions from being replayed across mint calls for the same
//! resource. Its role is uniqueness, not secrecy, so any reasonable PRNG
//! will do.

use rand::Rng;

/// Alphabet the salt is drawn from: `a-z`, `A-Z`, `+`, `/`, `=`.
pub const SALT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+/=";

/// Generate a random salt of exactly `length` characters using the thread
/// RNG. `length = 0` yields the empty string.
pub fn salt(length: usize) -> String {
    salt_with(&mut rand::thread_rng(), length)
}

/// Generate a random salt from a caller-supplied RNG.
///
/// Characters are drawn independently and uniformly, with replacement,
/// from [`SALT_ALPHABET`].
pub fn salt_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| SALT_ALPHABET[rng.gen_range(0..SALT_ALPHABET.len())] as char)
        .collect()
}
