//! Constants for AirGate Core
//!
//! Centralized policy values and result wording. Changing anything here
//! changes what downstream consumers see, so each value documents where it
//! comes from.
//!
//! ## Organization
//!
//! - **Thresholds**: Largest plausible change between consecutive readings
//! - **Reasons**: Human-readable explanations attached to each result

/// Per-channel delta limits for the continuity check.
pub mod thresholds;

/// Result reason strings.
pub mod reasons;

pub use thresholds::{MAX_CO2_DELTA_PPM, MAX_PM10_DELTA_UG_M3, MAX_PM25_DELTA_UG_M3};
