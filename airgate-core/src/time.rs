//! Timestamps for telemetry records
//!
//! Sensors report wall-clock instants as ISO 8601 text. RFC 3339 is the
//! common case; reduced-precision (`10:00Z`), colon-less offsets (`+0200`)
//! and the basic format (`20240301T100000Z`) are accepted too. Two things
//! matter:
//! - The parsed instant, which drives the continuity check
//! - The original text, which is what the sensor signed
//!
//! Offsets are mandatory. A naive local time cannot be ordered against
//! readings from another timezone, so it is rejected at parse time.

use core::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::errors::{FieldError, FieldResult};

/// ISO 8601 layouts tried when RFC 3339 parsing fails; every one needs an offset
const ISO_8601_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y%m%dT%H%M%S%.f%#z",
    "%Y%m%dT%H%M%#z",
];

/// An absolute instant together with the text it was parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    instant: DateTime<FixedOffset>,
    text: String,
}

impl Timestamp {
    /// Parse an ISO 8601 timestamp with an offset; a trailing `Z` denotes UTC
    pub fn parse(text: &str) -> FieldResult<Self> {
        let instant = DateTime::parse_from_rfc3339(text).or_else(|rfc3339_err| {
            ISO_8601_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(text, format).ok())
                .ok_or_else(|| FieldError::Timestamp {
                    value: text.to_string(),
                    reason: rfc3339_err.to_string(),
                })
        })?;

        Ok(Self {
            instant,
            text: text.to_string(),
        })
    }

    /// The instant with the sensor's original offset
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// The text exactly as supplied by the producer
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Signed time elapsed since `earlier`
    ///
    /// Negative when `self` precedes `earlier`. Offsets are normalized, so
    /// `12:00+02:00` and `10:00Z` are the same instant.
    pub fn elapsed_since(&self, earlier: &Timestamp) -> TimeDelta {
        self.instant.signed_duration_since(earlier.instant)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Express a delta in fractional seconds for log output
pub fn as_seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}
