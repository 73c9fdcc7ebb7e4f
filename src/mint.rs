//! Stamp minting
//!
//! Minting assembles a challenge string and then brute-forces a counter
//! whose digest starts with the required number of zero hex digits. The
//! search is CPU-bound and unbounded by default; callers wanting a ceiling
//! pass an iteration limit or raise the cancellation flag from another
//! thread.
//!
//! [`mint_parallel`] shards the counter space over worker threads by
//! interleaved stride (worker `k` tries `k`, `k + n`, `k + 2n`, ...); all
//! workers share the same challenge and the first success stops the rest.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{Local, NaiveDateTime};
use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::digest::{DigestError, DigestProvider, Sha256Digest};
use crate::salt::salt_with;
use crate::stamp::{DATE_FORMAT, DATE_TIME_FORMAT};

/// Minting parameters.
///
/// The defaults match the common hashcash configuration: 20 bits of
/// difficulty, a 16-character salt, empty extension and a date-only
/// timestamp.
#[derive(Debug, Clone)]
pub struct MintOptions {
    /// Difficulty in bits of required leading zeros.
    pub bits: u32,
    /// Extension string embedded verbatim in the stamp.
    pub ext: String,
    /// Length of the random salt.
    pub salt_length: usize,
    /// Timestamp with seconds precision (`yymmddhhmmss`) instead of
    /// date-only (`yymmdd`).
    pub stamp_seconds: bool,
}

impl Default for MintOptions {
    fn default() -> Self {
        Self {
            bits: 20,
            ext: String::new(),
            salt_length: 16,
            stamp_seconds: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum MintError {
    /// The digest provider failed; the search aborts rather than loop
    /// forever against a broken collaborator.
    #[error(transparent)]
    Digest(#[from] DigestError),

    /// The cancellation flag was raised before a solution was found.
    #[error("minting was cancelled before a solution was found")]
    Cancelled,

    /// The iteration limit was reached, or the counter space wrapped.
    #[error("counter search exhausted after {attempts} attempts")]
    Exhausted { attempts: u64 },
}

/// A solved challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// The full stamp text, `challenge:counter`.
    pub stamp: String,
    /// The winning counter value.
    pub counter: u64,
    /// Digests computed before the solution was found.
    pub attempts: u64,
}

/// Number of leading zero hex digits required for `bits` of difficulty.
pub fn hex_digits(bits: u32) -> usize {
    bits.div_ceil(4) as usize
}

/// Whether a lowercase hex digest starts with `zero_digits` zeros.
pub fn meets_target(digest_hex: &str, zero_digits: usize) -> bool {
    digest_hex.len() >= zero_digits
        && digest_hex.bytes().take(zero_digits).all(|b| b == b'0')
}

/// Mint a stamp for `resource` using the local clock, the thread RNG and
/// the SHA-256 provider.
pub fn mint(resource: &str, options: &MintOptions) -> Result<String, MintError> {
    mint_with(
        &Sha256Digest,
        &mut rand::thread_rng(),
        Local::now().naive_local(),
        resource,
        options,
    )
}

/// Mint a stamp with an injected digest provider, RNG and clock reading.
///
/// With a seeded RNG and a fixed `now` the result is fully deterministic,
/// which is what tests want.
pub fn mint_with<D, R>(
    digest: &D,
    rng: &mut R,
    now: NaiveDateTime,
    resource: &str,
    options: &MintOptions,
) -> Result<String, MintError>
where
    D: DigestProvider,
    R: Rng + ?Sized,
{
    let challenge = build_challenge(rng, now, resource, options);
    let cancel = AtomicBool::new(false);
    let solution = solve(digest, &challenge, hex_digits(options.bits), 0, 1, None, &cancel)?;
    Ok(solution.stamp)
}

/// Mint a stamp using `threads` workers sharing one challenge.
///
/// The counter space is partitioned by interleaved stride, so the workers
/// never overlap; the first to find a solution raises the stop flag and
/// the rest exit. Expected speedup is linear in the worker count.
pub fn mint_parallel(
    resource: &str,
    options: &MintOptions,
    threads: usize,
) -> Result<String, MintError> {
    mint_parallel_with(
        &Sha256Digest,
        &mut rand::thread_rng(),
        Local::now().naive_local(),
        resource,
        options,
        threads,
    )
}

/// [`mint_parallel`] with an injected digest provider, RNG and clock.
pub fn mint_parallel_with<D, R>(
    digest: &D,
    rng: &mut R,
    now: NaiveDateTime,
    resource: &str,
    options: &MintOptions,
    threads: usize,
) -> Result<String, MintError>
where
    D: DigestProvider + Sync,
    R: Rng + ?Sized,
{
    let threads = threads.max(1);
    let challenge = build_challenge(rng, now, resource, options);
    let zero_digits = hex_digits(options.bits);

    let stop = AtomicBool::new(false);
    let found: Mutex<Option<Solution>> = Mutex::new(None);
    let fault: Mutex<Option<MintError>> = Mutex::new(None);

    std::thread::scope(|scope| {
        for worker in 0..threads {
            let challenge = challenge.as_str();
            let (stop, found, fault) = (&stop, &found, &fault);
            scope.spawn(move || {
                match solve(
                    digest,
                    challenge,
                    zero_digits,
                    worker as u64,
                    threads as u64,
                    None,
                    stop,
                ) {
                    Ok(solution) => {
                        let mut slot = found.lock().unwrap();
                        if slot.is_none() {
                            *slot = Some(solution);
                        }
                        stop.store(true, Ordering::SeqCst);
                    }
                    // Another worker won the race.
                    Err(MintError::Cancelled) => {}
                    Err(err) => {
                        let mut slot = fault.lock().unwrap();
                        if slot.is_none() {
                            *slot = Some(err);
                        }
                        stop.store(true, Ordering::SeqCst);
                    }
                }
            });
        }
    });

    if let Some(solution) = found.lock().unwrap().take() {
        return Ok(solution.stamp);
    }
    let result = match fault.lock().unwrap().take() {
        Some(err) => Err(err),
        None => Err(MintError::Cancelled),
    };
    result
}

/// Search the counter space for a digest with `zero_digits` leading zeros.
///
/// A pure function of the challenge and target prefix length: the caller
/// owns the cancellation flag and the optional bound on digest
/// evaluations. `start`/`stride` pick the slice of the counter space to
/// search (`0, 1` for the whole space).
pub fn solve<D: DigestProvider>(
    digest: &D,
    challenge: &str,
    zero_digits: usize,
    start: u64,
    stride: u64,
    limit: Option<u64>,
    cancel: &AtomicBool,
) -> Result<Solution, MintError> {
    debug_assert!(stride > 0);
    let mut counter = start;
    let mut attempts: u64 = 0;

    loop {
        if cancel.load(Ordering::Relaxed) {
            return Err(MintError::Cancelled);
        }
        if limit.is_some_and(|limit| attempts >= limit) {
            return Err(MintError::Exhausted { attempts });
        }

        // The counter's textual rendering is part of the proof: the digest
        // covers the literal candidate string, so the rendering must stay
        // stable (uppercase hex, natural width).
        let candidate = format!("{challenge}:{counter:X}");
        let hash = digest.hex_digest(&candidate)?;
        attempts += 1;

        if meets_target(&hash, zero_digits) {
            debug!("solved {zero_digits}-digit challenge after {attempts} digests");
            return Ok(Solution {
                stamp: candidate,
                counter,
                attempts,
            });
        }

        counter = match counter.checked_add(stride) {
            Some(next) => next,
            None => return Err(MintError::Exhausted { attempts }),
        };
    }
}

fn build_challenge<R: Rng + ?Sized>(
    rng: &mut R,
    now: NaiveDateTime,
    resource: &str,
    options: &MintOptions,
) -> String {
    let format = if options.stamp_seconds {
        DATE_TIME_FORMAT
    } else {
        DATE_FORMAT
    };
    format!(
        "1:{}:{}:{}:{}:{}",
        options.bits,
        now.format(format),
        resource,
        options.ext,
        salt_with(rng, options.salt_length)
    )
}
