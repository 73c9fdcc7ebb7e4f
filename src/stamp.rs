//! Stamp data model
//!
//! A stamp is a colon-delimited line of text. Two layouts exist:
//!
//! ```text
//! 0:yymmdd:resource:suffix
//! 1:claim:yymmdd[hhmmss]:resource:ext:random:counter
//! ```
//!
//! Parsing validates the layout for the claimed version and produces an
//! immutable [`Stamp`]; anything malformed is a [`ParseStampError`] and no
//! partial stamp is ever exposed. [`Display`](std::fmt::Display) renders
//! the canonical text form, and a stamp round-trips through parse/format
//! byte-identically.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date-only stamp timestamp format (`yymmdd`).
pub const DATE_FORMAT: &str = "%y%m%d";

/// Date-and-time stamp timestamp format (`yymmddhhmmss`).
pub const DATE_TIME_FORMAT: &str = "%y%m%d%H%M%S";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseStampError {
    /// First field was not `0` or `1` (or not an integer at all).
    #[error("unsupported stamp version {0:?}")]
    UnsupportedVersion(String),

    /// Wrong number of colon-separated fields for the claimed version.
    #[error("version {version} stamp has {found} fields, expected {expected}")]
    FieldCount {
        version: u32,
        expected: usize,
        found: usize,
    },

    /// Claimed difficulty is not an unsigned integer.
    #[error("claim {0:?} is not an unsigned integer")]
    InvalidClaim(String),

    /// Date field is not a valid 6-digit date or 12-digit date-time.
    #[error("date field {0:?} is not a valid yymmdd or yymmddhhmmss timestamp")]
    InvalidDate(String),
}

/// The timestamp embedded in a version 1 stamp.
///
/// The parsed width (6 or 12 digits) is preserved so re-serialization is
/// byte-identical to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StampDate {
    /// A 6-digit `yymmdd` date.
    Day(NaiveDate),
    /// A 12-digit `yymmddhhmmss` date-time.
    Instant(NaiveDateTime),
}

impl StampDate {
    fn parse(field: &str) -> Result<Self, ParseStampError> {
        if !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseStampError::InvalidDate(field.to_string()));
        }
        match field.len() {
            6 => NaiveDate::parse_from_str(field, DATE_FORMAT)
                .map(StampDate::Day)
                .map_err(|_| ParseStampError::InvalidDate(field.to_string())),
            12 => NaiveDateTime::parse_from_str(field, DATE_TIME_FORMAT)
                .map(StampDate::Instant)
                .map_err(|_| ParseStampError::InvalidDate(field.to_string())),
            _ => Err(ParseStampError::InvalidDate(field.to_string())),
        }
    }

    /// The timestamp as a `NaiveDateTime`; date-only stamps count as
    /// midnight.
    pub fn to_date_time(self) -> NaiveDateTime {
        match self {
            StampDate::Day(date) => date.and_time(NaiveTime::MIN),
            StampDate::Instant(instant) => instant,
        }
    }
}

impl fmt::Display for StampDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StampDate::Day(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            StampDate::Instant(instant) => write!(f, "{}", instant.format(DATE_TIME_FORMAT)),
        }
    }
}

/// A version 0 stamp: `0:yymmdd:resource:suffix`.
///
/// Everything after `resource` is an opaque suffix and may itself contain
/// colons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampV0 {
    pub date: NaiveDate,
    pub resource: String,
    pub suffix: String,
}

impl StampV0 {
    fn parse(text: &str) -> Result<Self, ParseStampError> {
        let fields: Vec<&str> = text.splitn(4, ':').collect();
        if fields.len() != 4 {
            return Err(ParseStampError::FieldCount {
                version: 0,
                expected: 4,
                found: fields.len(),
            });
        }

        let date_field = fields[1];
        if date_field.len() != 6 || !date_field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseStampError::InvalidDate(date_field.to_string()));
        }
        let date = NaiveDate::parse_from_str(date_field, DATE_FORMAT)
            .map_err(|_| ParseStampError::InvalidDate(date_field.to_string()))?;

        Ok(StampV0 {
            date,
            resource: fields[2].to_string(),
            suffix: fields[3].to_string(),
        })
    }
}

impl fmt::Display for StampV0 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0:{}:{}:{}",
            self.date.format(DATE_FORMAT),
            self.resource,
            self.suffix
        )
    }
}

/// A version 1 stamp: `1:claim:date:resource:ext:random:counter`.
///
/// `ext`, `random` and `counter` are stored and compared as raw text; this
/// crate never interprets their contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampV1 {
    /// Difficulty (in bits) the minter claims to have satisfied.
    pub claim: u32,
    pub date: StampDate,
    pub resource: String,
    /// Extension string, opaque to this crate.
    pub ext: String,
    /// Uniqueness salt used when minting.
    pub random: String,
    /// Hexadecimal counter found by the minting search.
    pub counter: String,
}

impl StampV1 {
    fn parse(text: &str) -> Result<Self, ParseStampError> {
        let fields: Vec<&str> = text.split(':').collect();
        if fields.len() != 7 {
            return Err(ParseStampError::FieldCount {
                version: 1,
                expected: 7,
                found: fields.len(),
            });
        }

        let claim = fields[1]
            .parse::<u32>()
            .map_err(|_| ParseStampError::InvalidClaim(fields[1].to_string()))?;
        let date = StampDate::parse(fields[2])?;

        Ok(StampV1 {
            claim,
            date,
            resource: fields[3].to_string(),
            ext: fields[4].to_string(),
            random: fields[5].to_string(),
            counter: fields[6].to_string(),
        })
    }
}

impl fmt::Display for StampV1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "1:{}:{}:{}:{}:{}:{}",
            self.claim, self.date, self.resource, self.ext, self.random, self.counter
        )
    }
}

/// A parsed hashcash stamp, tagged by format version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stamp {
    V0(StampV0),
    V1(StampV1),
}

impl Stamp {
    /// Format version, `0` or `1`.
    pub fn version(&self) -> u32 {
        match self {
            Stamp::V0(_) => 0,
            Stamp::V1(_) => 1,
        }
    }

    /// The resource this stamp is bound to.
    pub fn resource(&self) -> &str {
        match self {
            Stamp::V0(stamp) => &stamp.resource,
            Stamp::V1(stamp) => &stamp.resource,
        }
    }

    /// Claimed difficulty in bits; only version 1 stamps carry one.
    pub fn claim(&self) -> Option<u32> {
        match self {
            Stamp::V0(_) => None,
            Stamp::V1(stamp) => Some(stamp.claim),
        }
    }

    /// The embedded timestamp; date-only stamps count as midnight.
    pub fn date_time(&self) -> NaiveDateTime {
        match self {
            Stamp::V0(stamp) => stamp.date.and_time(NaiveTime::MIN),
            Stamp::V1(stamp) => stamp.date.to_date_time(),
        }
    }
}

impl FromStr for Stamp {
    type Err = ParseStampError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let version = text.split(':').next().unwrap_or_default();
        match version.parse::<u32>() {
            Ok(0) => StampV0::parse(text).map(Stamp::V0),
            Ok(1) => StampV1::parse(text).map(Stamp::V1),
            _ => Err(ParseStampError::UnsupportedVersion(version.to_string())),
        }
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stamp::V0(stamp) => fmt::Display::fmt(stamp, f),
            Stamp::V1(stamp) => fmt::Display::fmt(stamp, f),
        }
    }
}
