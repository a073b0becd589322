//! Core validation engine for AirGate
//!
//! A trust gate for air-quality telemetry. Every record in an ordered stream
//! is classified before downstream analytics see it:
//!
//! - `ok`: signature valid, sequence plausible
//! - `tampered`: signature invalid, or time went backwards for its sensor
//! - `suspicious`: authentic, but a reading jumped past policy limits
//! - `invalid`: not a telemetry record at all
//!
//! The engine never repairs data and never aborts a run; a bad record only
//! affects its own classification.
//!
//! ```rust
//! use airgate_core::{integrity, Record, SecretKey, Status, Validator};
//!
//! let key = SecretKey::from("shared-secret");
//! let record = Record::new("S1", "2024-03-01T10:00:00Z", 12.5, 20.0, 415.0)?;
//! let signature = integrity::sign(&record, &key)?;
//!
//! let validator = Validator::new(key);
//! let results = validator.validate([record.with_signature(signature)]);
//! assert_eq!(results[0].status, Status::Ok);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod canonical;
pub mod constants;
pub mod continuity;
pub mod errors;
pub mod integrity;
pub mod record;
pub mod summary;
pub mod time;
pub mod validator;

// Public API
pub use canonical::canonical_payload;
pub use continuity::{Channel, Continuity, ContinuityPolicy, ContinuityState, Jump};
pub use errors::{FieldError, FieldResult, IntegrityError, RecordError};
pub use integrity::{sign, verify, SecretKey};
pub use record::{RawRecord, Record};
pub use summary::Summary;
pub use time::Timestamp;
pub use validator::{validate, Session, Status, ValidationResult, ValidationStream, Validator, Verdict};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
