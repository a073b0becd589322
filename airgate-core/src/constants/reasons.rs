//! Result Reasons
//!
//! Consumers match on `status`, but people read `reason`. Keep these stable:
//! dashboards and alert rules grep for them.

/// First valid reading for a sensor in this run.
pub const FIRST_SEEN: &str = "signature valid; first reading for sensor";

/// Signature valid and continuity holds.
pub const CONTINUOUS: &str = "signature and continuity checks passed";

/// Claimed signature does not match the canonical payload.
pub const SIGNATURE_MISMATCH: &str = "HMAC signature mismatch";

/// Timestamp does not advance past the sensor's baseline.
pub const NON_MONOTONIC: &str = "timestamp is not monotonic";

/// Prefix for suspicious results; the exceeded channels follow.
pub const ABNORMAL_JUMP: &str = "abnormal jump detected";
