//! Canonical payload encoding
//!
//! The signature covers the *meaning* of a record, not the bytes it arrived
//! in. Two records with the same semantic values must encode identically no
//! matter how the producer ordered its keys, spaced its JSON or decorated the
//! object with extra fields.
//!
//! ## Encoding
//!
//! Compact JSON, keys in fixed sorted order, no whitespace:
//!
//! ```text
//! {"co2":415.0,"pm10":20.0,"pm25":12.5,"sensor_id":"S1","timestamp":"2024-03-01T10:00:00Z"}
//! ```
//!
//! - Readings are written as `f64` with shortest round-trip formatting, so the
//!   integer `20` and the float `20.0` are the same reading. `-0.0` is
//!   written as `0.0`, since the two compare equal.
//! - The timestamp is written as the text the producer supplied, which is the
//!   value the producer signed.
//! - `signature` is never part of the payload.

use serde::Serialize;

use crate::errors::IntegrityError;
use crate::record::Record;

/// Field order is the sorted key order; serde_json preserves declaration order
#[derive(Serialize)]
struct CanonicalPayload<'a> {
    co2: f64,
    pm10: f64,
    pm25: f64,
    sensor_id: &'a str,
    timestamp: &'a str,
}

impl<'a> From<&'a Record> for CanonicalPayload<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            co2: unsigned_zero(record.co2()),
            pm10: unsigned_zero(record.pm10()),
            pm25: unsigned_zero(record.pm25()),
            sensor_id: record.sensor_id(),
            timestamp: record.timestamp().as_str(),
        }
    }
}

fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Encode the semantic fields of `record` into canonical bytes
pub fn canonical_payload(record: &Record) -> Result<Vec<u8>, IntegrityError> {
    Ok(serde_json::to_vec(&CanonicalPayload::from(record))?)
}
