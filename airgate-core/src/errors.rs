//! Error Types for Record-Level Validation Failures
//!
//! ## Design Philosophy
//!
//! AirGate classifies every record instead of failing the run, so errors here
//! never escape the validator. They exist to carry a precise description into
//! the `reason` of an `invalid` result:
//!
//! 1. **Field Precision**: A schema failure names the field that was missing or
//!    had the wrong type, so the producer can fix its encoder.
//!
//! 2. **Record Locality**: Every error belongs to exactly one record. Nothing in
//!    this module describes run-wide state.
//!
//! 3. **No Secrets**: Integrity errors describe what failed, never the key or
//!    the computed MAC.
//!
//! ## Error Categories
//!
//! ### Schema Violations ([`FieldError`])
//! - `Missing`: A required field is absent
//! - `WrongType`: A field is present with the wrong JSON type
//! - `Empty`: `sensor_id` is an empty string
//! - `NotFinite`: A reading is NaN or infinite
//! - `Timestamp`: The timestamp has no offset or does not parse
//! - `Malformed`: The line is not a JSON object at all
//!
//! ### Integrity Faults ([`IntegrityError`])
//! - `Encoding`: The canonical payload could not be produced
//! - `Key`: The MAC could not be keyed
//!
//! Neither category is a *tampered* signal. A signature that does not match is
//! an ordinary outcome of verification, not an error.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use airgate_core::{FieldError, Record};
//!
//! match Record::from_json(r#"{"sensor_id":"S1"}"#) {
//!     Ok(record) => { /* verify and check continuity */ }
//!     Err(FieldError::Missing { field }) => assert_eq!(field, "timestamp"),
//!     Err(other) => panic!("unexpected: {other}"),
//! }
//! ```

use thiserror::Error;

/// Result type for schema parsing
pub type FieldResult<T> = Result<T, FieldError>;

/// A record did not match the telemetry schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Required field absent
    #[error("missing field '{field}'")]
    Missing {
        /// Name of the absent field
        field: &'static str,
    },

    /// Field present with the wrong JSON type
    #[error("field '{field}' must be {expected}")]
    WrongType {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable description of the expected type
        expected: &'static str,
    },

    /// Field is present but empty where a value is required
    #[error("field '{field}' must not be empty")]
    Empty {
        /// Name of the offending field
        field: &'static str,
    },

    /// Reading is NaN or infinite
    #[error("field '{field}' must be a finite number")]
    NotFinite {
        /// Name of the offending reading
        field: &'static str,
    },

    /// Timestamp could not be parsed as an absolute, offset-qualified instant
    #[error("invalid timestamp '{value}': {reason}")]
    Timestamp {
        /// The text that failed to parse
        value: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Input is not a JSON object
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Canonical encoding or MAC construction failed
///
/// These indicate an internal fault, not a forged record.
#[derive(Error, Debug)]
pub enum IntegrityError {
    /// Canonical payload could not be serialized
    #[error("canonical encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// HMAC rejected the key length
    #[error("HMAC key rejected")]
    Key,
}

/// Anything that turns a record into an `invalid` classification
#[derive(Error, Debug)]
pub enum RecordError {
    /// Schema violation while coercing the raw input
    #[error("parse error: {0}")]
    Field(#[from] FieldError),

    /// Unexpected fault inside the verification pipeline
    #[error("internal fault: {0}")]
    Internal(#[from] IntegrityError),
}
