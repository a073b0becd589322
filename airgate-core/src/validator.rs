//! Stream validation
//!
//! ## Overview
//!
//! The validator is the trust gate itself. It walks an ordered stream of raw
//! records and classifies each one:
//!
//! ```text
//! raw ──parse──► Record ──verify──► signed ──continuity──► outcome
//!  │               │                  │                       │
//!  └─► invalid     └─► tampered       ├─► ok / suspicious     │
//!                                     └─► tampered            │
//!                                   baseline updated ◄────────┘
//! ```
//!
//! Every record yields exactly one [`ValidationResult`], in input order. No
//! record can end the run: schema violations and internal faults are
//! [`Verdict::Rejected`] values, not panics or early returns.
//!
//! ## Sessions
//!
//! Continuity state belongs to a [`Session`], never to the [`Validator`]. One
//! validator (key + policy) can drive any number of independent sessions, on
//! any number of threads, without them observing each other's baselines.
//!
//! ```rust
//! use airgate_core::{Status, Validator, SecretKey};
//!
//! let validator = Validator::new(SecretKey::from("shared-secret"));
//! let results = validator.validate([r#"{"sensor_id":"S1"}"#]);
//! assert_eq!(results[0].status, Status::Invalid);
//! ```

use core::fmt;

use serde::Serialize;

use crate::constants::reasons;
use crate::continuity::{Continuity, ContinuityPolicy, ContinuityState};
use crate::errors::RecordError;
use crate::integrity::{self, SecretKey};
use crate::record::RawRecord;
use crate::time;

/// Classification of one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Signature valid and continuity holds (or first reading)
    Ok,
    /// Signature invalid, or time went backwards
    Tampered,
    /// Signature valid and time advanced, but a reading jumped
    Suspicious,
    /// Could not be parsed, or processing faulted
    Invalid,
}

impl Status {
    /// Every status, in reporting order
    pub const ALL: [Status; 4] = [Status::Ok, Status::Tampered, Status::Suspicious, Status::Invalid];

    /// Lowercase name as used on the wire
    pub const fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Tampered => "tampered",
            Status::Suspicious => "suspicious",
            Status::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for the record at `index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Zero-based position in the input stream
    pub index: usize,
    /// Classification
    pub status: Status,
    /// Human-readable explanation
    pub reason: String,
}

/// Typed outcome of the per-record pipeline
#[derive(Debug)]
pub enum Verdict {
    /// Claimed signature does not match
    SignatureMismatch,
    /// Signature verified; continuity decided the rest
    Checked(Continuity),
    /// Parse failure or internal fault
    Rejected(RecordError),
}

impl Verdict {
    /// Map to the public classification
    pub fn status(&self) -> Status {
        match self {
            Verdict::SignatureMismatch => Status::Tampered,
            Verdict::Checked(Continuity::FirstSeen | Continuity::Continuous) => Status::Ok,
            Verdict::Checked(Continuity::NonMonotonic { .. }) => Status::Tampered,
            Verdict::Checked(Continuity::AbnormalJump { .. }) => Status::Suspicious,
            Verdict::Rejected(_) => Status::Invalid,
        }
    }

    /// Explanation attached to the result
    pub fn reason(&self) -> String {
        match self {
            Verdict::SignatureMismatch => reasons::SIGNATURE_MISMATCH.to_string(),
            Verdict::Checked(Continuity::FirstSeen) => reasons::FIRST_SEEN.to_string(),
            Verdict::Checked(Continuity::Continuous) => reasons::CONTINUOUS.to_string(),
            Verdict::Checked(Continuity::NonMonotonic { .. }) => reasons::NON_MONOTONIC.to_string(),
            Verdict::Checked(Continuity::AbnormalJump { jumps }) => {
                let details: Vec<String> = jumps.iter().map(ToString::to_string).collect();
                format!("{}: {}", reasons::ABNORMAL_JUMP, details.join(", "))
            }
            Verdict::Rejected(err) => err.to_string(),
        }
    }
}

/// Key and policy shared by every session
#[derive(Debug, Clone)]
pub struct Validator {
    key: SecretKey,
    policy: ContinuityPolicy,
}

impl Validator {
    /// Validator with the default continuity policy
    pub fn new(key: SecretKey) -> Self {
        Self {
            key,
            policy: ContinuityPolicy::default(),
        }
    }

    /// Replace the continuity policy
    pub fn with_policy(mut self, policy: ContinuityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active continuity policy
    pub fn policy(&self) -> &ContinuityPolicy {
        &self.policy
    }

    /// Start a run with empty continuity state
    pub fn session(&self) -> Session<'_> {
        Session {
            validator: self,
            state: ContinuityState::new(),
            next_index: 0,
        }
    }

    /// Classify every record, in order
    pub fn validate<I>(&self, records: I) -> Vec<ValidationResult>
    where
        I: IntoIterator,
        I::Item: RawRecord,
    {
        self.stream(records).collect()
    }

    /// Classify records lazily as they are pulled
    pub fn stream<I>(&self, records: I) -> ValidationStream<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: RawRecord,
    {
        ValidationStream {
            session: self.session(),
            records: records.into_iter(),
        }
    }
}

/// Classify `records` with `key` and the default policy
pub fn validate<I>(records: I, key: &SecretKey) -> Vec<ValidationResult>
where
    I: IntoIterator,
    I::Item: RawRecord,
{
    Validator::new(key.clone()).validate(records)
}

/// One validation run
pub struct Session<'a> {
    validator: &'a Validator,
    state: ContinuityState,
    next_index: usize,
}

impl Session<'_> {
    /// Classify the next record of the stream
    pub fn process<R: RawRecord>(&mut self, raw: R) -> ValidationResult {
        let index = self.next_index;
        self.next_index += 1;

        let verdict = self.classify(raw).unwrap_or_else(Verdict::Rejected);
        let result = ValidationResult {
            index,
            status: verdict.status(),
            reason: verdict.reason(),
        };

        match result.status {
            Status::Tampered => log::warn!("record #{index} tampered: {}", result.reason),
            Status::Invalid => log::warn!("record #{index} invalid: {}", result.reason),
            _ => log::debug!("record #{index} [{}] {}", result.status, result.reason),
        }

        result
    }

    fn classify<R: RawRecord>(&mut self, raw: R) -> Result<Verdict, RecordError> {
        let record = raw.into_record()?;

        if !integrity::verify(&record, &self.validator.key)? {
            return Ok(Verdict::SignatureMismatch);
        }

        let outcome = self
            .validator
            .policy
            .check(&record, self.state.baseline(record.sensor_id()));
        if let Continuity::NonMonotonic { elapsed } = &outcome {
            log::debug!(
                "{} is {}s behind its baseline",
                record.sensor_id(),
                time::as_seconds(-*elapsed)
            );
        }
        if outcome.accepts_baseline() {
            self.state.accept(record);
        }

        Ok(Verdict::Checked(outcome))
    }

    /// Baselines accumulated so far
    pub fn state(&self) -> &ContinuityState {
        &self.state
    }

    /// Records processed so far
    pub fn processed(&self) -> usize {
        self.next_index
    }
}

/// Lazy adapter returned by [`Validator::stream`]
pub struct ValidationStream<'a, I> {
    session: Session<'a>,
    records: I,
}

impl<'a, I> ValidationStream<'a, I> {
    /// Session driving this stream
    pub fn session(&self) -> &Session<'a> {
        &self.session
    }
}

impl<I> Iterator for ValidationStream<'_, I>
where
    I: Iterator,
    I::Item: RawRecord,
{
    type Item = ValidationResult;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.records.next()?;
        Some(self.session.process(raw))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}
