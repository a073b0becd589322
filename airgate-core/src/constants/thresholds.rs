//! Continuity Thresholds
//!
//! Largest absolute change between a sensor's baseline and its next reading
//! that is still considered ordinary. The check is on the raw delta, not a
//! rate: reporting intervals of fielded air-quality nodes are short and
//! regular enough that elapsed time adds nothing but noise.
//!
//! A delta *equal* to the limit passes. Only strict excess is flagged.

/// Maximum PM2.5 change between consecutive readings (μg/m³).
///
/// Wildfire smoke fronts and indoor combustion can move PM2.5 by tens of
/// μg/m³ within a minute; a jump past 120 is rare enough to warrant review.
pub const MAX_PM25_DELTA_UG_M3: f64 = 120.0;

/// Maximum PM10 change between consecutive readings (μg/m³).
///
/// Coarse particles swing harder than fine ones (dust, construction), hence
/// the wider band.
pub const MAX_PM10_DELTA_UG_M3: f64 = 180.0;

/// Maximum CO2 change between consecutive readings (ppm).
///
/// Outdoor baseline is ~420 ppm and a crowded room reaches 2000+ ppm. A
/// change of more than 800 ppm between two readings points at a relocated
/// or spoofed node.
pub const MAX_CO2_DELTA_PPM: f64 = 800.0;
