//! Stamp verification
//!
//! Verification is cheap: parse the stamp, apply the policy checks, then
//! recompute one digest over the entire stamp text and inspect its prefix.
//! Policy failures collapse to a boolean `false` from [`check`]; the
//! [`verify`] family additionally reports which check failed. Only a
//! digest-provider fault surfaces as an `Err`.

use chrono::{Duration, Local, NaiveDateTime};
use log::debug;
use serde::Serialize;

use crate::digest::{DigestError, DigestProvider, Sha256Digest};
use crate::mint::{hex_digits, meets_target};
use crate::stamp::Stamp;

/// Outcome of verifying a stamp against a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    /// The stamp text failed to parse.
    Malformed,
    /// The stamp is bound to a different resource.
    WrongResource,
    /// The stamp claims fewer bits than the caller requires.
    InsufficientClaim,
    /// The stamp's date falls outside the acceptance window.
    Expired,
    /// The digest does not carry the required zero prefix.
    InsufficientWork,
}

impl Verdict {
    pub fn is_valid(self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Verdict::Valid => "valid",
            Verdict::Malformed => "malformed stamp",
            Verdict::WrongResource => "resource mismatch",
            Verdict::InsufficientClaim => "claimed bits below requirement",
            Verdict::Expired => "stamp outside acceptance window",
            Verdict::InsufficientWork => "digest lacks required zero prefix",
        })
    }
}

/// Check a stamp: `Ok(true)` iff it parses, matches the expected
/// `resource` (when supplied), satisfies `bits` of difficulty and falls
/// inside the `expiration` window (seconds, when supplied).
///
/// `Err` is reserved for digest-provider faults; every policy failure is
/// `Ok(false)`.
pub fn check(
    stamp: &str,
    resource: Option<&str>,
    bits: u32,
    expiration: Option<i64>,
) -> Result<bool, DigestError> {
    verify(stamp, resource, bits, expiration).map(Verdict::is_valid)
}

/// [`check`] with an injected digest provider and clock reading.
pub fn check_with<D: DigestProvider>(
    digest: &D,
    now: NaiveDateTime,
    stamp: &str,
    resource: Option<&str>,
    bits: u32,
    expiration: Option<i64>,
) -> Result<bool, DigestError> {
    verify_with(digest, now, stamp, resource, bits, expiration).map(Verdict::is_valid)
}

/// Like [`check`], but reports which policy check failed.
pub fn verify(
    stamp: &str,
    resource: Option<&str>,
    bits: u32,
    expiration: Option<i64>,
) -> Result<Verdict, DigestError> {
    verify_with(
        &Sha256Digest,
        Local::now().naive_local(),
        stamp,
        resource,
        bits,
        expiration,
    )
}

/// [`verify`] with an injected digest provider and clock reading.
///
/// Checks short-circuit in order: parse, resource match, claim policy,
/// expiration, digest prefix.
pub fn verify_with<D: DigestProvider>(
    digest: &D,
    now: NaiveDateTime,
    stamp: &str,
    resource: Option<&str>,
    bits: u32,
    expiration: Option<i64>,
) -> Result<Verdict, DigestError> {
    let parsed: Stamp = match stamp.parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!("stamp rejected: {err}");
            return Ok(Verdict::Malformed);
        }
    };

    if let Some(expected) = resource {
        if expected != parsed.resource() {
            return Ok(Verdict::WrongResource);
        }
    }

    // A version 1 stamp that self-reports fewer bits than required is
    // rejected outright; a claim at or above the floor is trusted but
    // verified cryptographically below.
    let effective_bits = match parsed.claim() {
        Some(claim) if claim < bits => return Ok(Verdict::InsufficientClaim),
        Some(claim) => claim,
        None => bits,
    };

    // Acceptance window, not an age check: the stamp's date must be
    // earlier than now + expiration. A stamp dated far in the past still
    // passes for any positive expiration.
    if let Some(expiration) = expiration {
        let good_until = now + Duration::seconds(expiration);
        if parsed.date_time() >= good_until {
            return Ok(Verdict::Expired);
        }
    }

    // The proof covers the entire stamp text, not just the challenge.
    let hash = digest.hex_digest(stamp)?;
    if meets_target(&hash, hex_digits(effective_bits)) {
        Ok(Verdict::Valid)
    } else {
        Ok(Verdict::InsufficientWork)
    }
}
