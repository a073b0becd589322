//! Per-sensor continuity tracking
//!
//! A valid signature proves who produced a record, not that the record makes
//! sense in sequence. Replayed or reordered records carry perfectly good
//! signatures. The continuity check compares each record with the last one
//! *accepted* for the same sensor (its baseline):
//!
//! ```text
//! no baseline                  → FirstSeen      (ok, becomes baseline)
//! dt <= 0                      → NonMonotonic   (tampered, baseline kept)
//! any |delta| > limit          → AbnormalJump   (suspicious, becomes baseline)
//! otherwise                    → Continuous     (ok, becomes baseline)
//! ```
//!
//! An abnormal jump still moves the baseline. A genuine step change, such as
//! a smoke plume arriving, is flagged once at the transition rather than on
//! every reading that follows it.
//!
//! Records from different sensors are never compared.

use std::collections::HashMap;

use core::fmt;

use chrono::TimeDelta;

use crate::constants::thresholds::{MAX_CO2_DELTA_PPM, MAX_PM10_DELTA_UG_M3, MAX_PM25_DELTA_UG_M3};
use crate::record::Record;

/// Measured channel of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Fine particulate matter
    Pm25,
    /// Coarse particulate matter
    Pm10,
    /// Carbon dioxide
    Co2,
}

impl Channel {
    /// Field name on the wire
    pub const fn name(&self) -> &'static str {
        match self {
            Channel::Pm25 => "pm25",
            Channel::Pm10 => "pm10",
            Channel::Co2 => "co2",
        }
    }

    fn reading(&self, record: &Record) -> f64 {
        match self {
            Channel::Pm25 => record.pm25(),
            Channel::Pm10 => record.pm10(),
            Channel::Co2 => record.co2(),
        }
    }
}

/// One channel whose change exceeded its limit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jump {
    /// Which reading jumped
    pub channel: Channel,
    /// Absolute change from the baseline
    pub delta: f64,
    /// Configured limit that was exceeded
    pub limit: f64,
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} delta {} exceeds {}", self.channel.name(), self.delta, self.limit)
    }
}

/// Outcome of comparing a record with its sensor's baseline
#[derive(Debug, Clone, PartialEq)]
pub enum Continuity {
    /// No baseline yet for this sensor
    FirstSeen,
    /// Time advanced and every delta is within limits
    Continuous,
    /// Time did not advance past the baseline
    NonMonotonic {
        /// Signed time from baseline to record (zero or negative)
        elapsed: TimeDelta,
    },
    /// Time advanced but at least one channel jumped
    AbnormalJump {
        /// Exceeded channels, in pm25, pm10, co2 order
        jumps: Vec<Jump>,
    },
}

impl Continuity {
    /// Whether the record becomes the sensor's new baseline
    pub fn accepts_baseline(&self) -> bool {
        !matches!(self, Continuity::NonMonotonic { .. })
    }
}

// `delta > NaN` is always false, so a NaN limit would switch detection off
fn sanitize_limit(channel: Channel, limit: f64, current: f64) -> f64 {
    if limit.is_finite() {
        limit.abs()
    } else {
        log::warn!("ignoring non-finite {} limit {}, keeping {}", channel.name(), limit, current);
        current
    }
}

/// Delta limits for the continuity check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuityPolicy {
    max_pm25_delta: f64,
    max_pm10_delta: f64,
    max_co2_delta: f64,
}

impl Default for ContinuityPolicy {
    fn default() -> Self {
        Self {
            max_pm25_delta: MAX_PM25_DELTA_UG_M3,
            max_pm10_delta: MAX_PM10_DELTA_UG_M3,
            max_co2_delta: MAX_CO2_DELTA_PPM,
        }
    }
}

impl ContinuityPolicy {
    /// Create a policy with custom limits
    ///
    /// Negative limits are taken as absolute values. A non-finite limit is
    /// ignored and the default for that channel applies.
    pub fn new_with_limits(pm25: f64, pm10: f64, co2: f64) -> Self {
        Self::default()
            .with_pm25_limit(pm25)
            .with_pm10_limit(pm10)
            .with_co2_limit(co2)
    }

    /// Override the PM2.5 limit
    pub fn with_pm25_limit(mut self, limit: f64) -> Self {
        self.max_pm25_delta = sanitize_limit(Channel::Pm25, limit, self.max_pm25_delta);
        self
    }

    /// Override the PM10 limit
    pub fn with_pm10_limit(mut self, limit: f64) -> Self {
        self.max_pm10_delta = sanitize_limit(Channel::Pm10, limit, self.max_pm10_delta);
        self
    }

    /// Override the CO2 limit
    pub fn with_co2_limit(mut self, limit: f64) -> Self {
        self.max_co2_delta = sanitize_limit(Channel::Co2, limit, self.max_co2_delta);
        self
    }

    /// Limit configured for `channel`
    pub fn limit(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Pm25 => self.max_pm25_delta,
            Channel::Pm10 => self.max_pm10_delta,
            Channel::Co2 => self.max_co2_delta,
        }
    }

    /// Compare `record` with the sensor's baseline
    ///
    /// `previous` must belong to the same sensor.
    pub fn check(&self, record: &Record, previous: Option<&Record>) -> Continuity {
        let Some(previous) = previous else {
            return Continuity::FirstSeen;
        };
        debug_assert_eq!(record.sensor_id(), previous.sensor_id());

        let elapsed = record.timestamp().elapsed_since(previous.timestamp());
        if elapsed <= TimeDelta::zero() {
            return Continuity::NonMonotonic { elapsed };
        }

        let jumps: Vec<Jump> = [Channel::Pm25, Channel::Pm10, Channel::Co2]
            .into_iter()
            .filter_map(|channel| {
                let delta = (channel.reading(record) - channel.reading(previous)).abs();
                let limit = self.limit(channel);
                (delta > limit).then_some(Jump { channel, delta, limit })
            })
            .collect();

        if jumps.is_empty() {
            Continuity::Continuous
        } else {
            Continuity::AbnormalJump { jumps }
        }
    }
}

/// Last accepted record per sensor for one validation run
///
/// Owned by a single session. Starts empty and is dropped with the session;
/// nothing is persisted between runs.
#[derive(Debug, Default, Clone)]
pub struct ContinuityState {
    baselines: HashMap<String, Record>,
}

impl ContinuityState {
    /// Empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current baseline for `sensor_id`
    pub fn baseline(&self, sensor_id: &str) -> Option<&Record> {
        self.baselines.get(sensor_id)
    }

    /// Make `record` the baseline for its sensor
    pub fn accept(&mut self, record: Record) {
        log::trace!("baseline for {} moves to {}", record.sensor_id(), record.timestamp());
        self.baselines.insert(record.sensor_id().to_string(), record);
    }

    /// Number of sensors with a baseline
    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    /// True before any record has been accepted
    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }

    /// Sensors seen so far, in no particular order
    pub fn sensors(&self) -> impl Iterator<Item = &str> {
        self.baselines.keys().map(String::as_str)
    }

    /// Forget every baseline
    pub fn clear(&mut self) {
        self.baselines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(ts: &str, pm25: f64, pm10: f64, co2: f64) -> Record {
        Record::new("S1", ts, pm25, pm10, co2).unwrap()
    }

    const T0: &str = "2024-03-01T10:00:00Z";
    const T1: &str = "2024-03-01T10:01:00Z";

    #[test]
    fn first_record_is_first_seen() {
        let policy = ContinuityPolicy::default();
        assert_eq!(policy.check(&reading(T0, 10.0, 20.0, 400.0), None), Continuity::FirstSeen);
    }

    #[test]
    fn small_changes_are_continuous() {
        let policy = ContinuityPolicy::default();
        let prev = reading(T0, 10.0, 20.0, 400.0);
        let next = reading(T1, 20.0, 40.0, 450.0);
        assert_eq!(policy.check(&next, Some(&prev)), Continuity::Continuous);
    }

    #[test]
    fn equal_or_earlier_time_is_non_monotonic() {
        let policy = ContinuityPolicy::default();
        let prev = reading(T1, 10.0, 20.0, 400.0);

        let same = policy.check(&reading(T1, 10.0, 20.0, 400.0), Some(&prev));
        assert_eq!(same, Continuity::NonMonotonic { elapsed: TimeDelta::zero() });
        assert!(!same.accepts_baseline());

        let earlier = policy.check(&reading(T0, 10.0, 20.0, 400.0), Some(&prev));
        assert_eq!(earlier, Continuity::NonMonotonic { elapsed: TimeDelta::seconds(-60) });
    }

    #[test]
    fn time_check_runs_before_delta_check() {
        let policy = ContinuityPolicy::default();
        let prev = reading(T1, 10.0, 20.0, 400.0);
        let outcome = policy.check(&reading(T0, 500.0, 20.0, 400.0), Some(&prev));
        assert!(matches!(outcome, Continuity::NonMonotonic { .. }));
    }

    #[test]
    fn threshold_is_inclusive() {
        let policy = ContinuityPolicy::default();
        let prev = reading(T0, 10.0, 20.0, 400.0);

        let at_limit = reading(T1, 130.0, 200.0, 1200.0);
        assert_eq!(policy.check(&at_limit, Some(&prev)), Continuity::Continuous);

        let over = reading(T1, 131.0, 200.0, 1200.0);
        assert_eq!(
            policy.check(&over, Some(&prev)),
            Continuity::AbnormalJump {
                jumps: vec![Jump { channel: Channel::Pm25, delta: 121.0, limit: 120.0 }]
            }
        );
    }

    #[test]
    fn drops_count_as_jumps() {
        let policy = ContinuityPolicy::default();
        let prev = reading(T0, 10.0, 20.0, 1500.0);
        let next = reading(T1, 10.0, 20.0, 600.0);
        let Continuity::AbnormalJump { jumps } = policy.check(&next, Some(&prev)) else {
            panic!("expected abnormal jump");
        };
        assert_eq!(jumps[0].channel, Channel::Co2);
        assert_eq!(jumps[0].to_string(), "co2 delta 900 exceeds 800");
    }

    #[test]
    fn all_exceeded_channels_are_reported() {
        let policy = ContinuityPolicy::default();
        let prev = reading(T0, 0.0, 0.0, 400.0);
        let next = reading(T1, 200.0, 300.0, 1300.0);
        let Continuity::AbnormalJump { jumps } = policy.check(&next, Some(&prev)) else {
            panic!("expected abnormal jump");
        };
        let channels: Vec<_> = jumps.iter().map(|j| j.channel).collect();
        assert_eq!(channels, [Channel::Pm25, Channel::Pm10, Channel::Co2]);
    }

    #[test]
    fn custom_limits() {
        let policy = ContinuityPolicy::new_with_limits(-5.0, 10.0, 50.0);
        assert_eq!(policy.limit(Channel::Pm25), 5.0);

        let prev = reading(T0, 10.0, 20.0, 400.0);
        let next = reading(T1, 16.0, 20.0, 400.0);
        assert!(matches!(policy.check(&next, Some(&prev)), Continuity::AbnormalJump { .. }));

        let relaxed = policy.with_pm25_limit(10.0);
        assert_eq!(relaxed.check(&next, Some(&prev)), Continuity::Continuous);
    }

    #[test]
    fn non_finite_limits_are_ignored() {
        let policy = ContinuityPolicy::new_with_limits(f64::NAN, f64::INFINITY, -50.0);
        assert_eq!(policy.limit(Channel::Pm25), MAX_PM25_DELTA_UG_M3);
        assert_eq!(policy.limit(Channel::Pm10), MAX_PM10_DELTA_UG_M3);
        assert_eq!(policy.limit(Channel::Co2), 50.0);

        let policy = ContinuityPolicy::default().with_pm25_limit(5.0).with_pm25_limit(f64::NAN);
        assert_eq!(policy.limit(Channel::Pm25), 5.0);

        let prev = reading(T0, 10.0, 20.0, 400.0);
        let next = reading(T1, 200.0, 20.0, 400.0);
        let policy = ContinuityPolicy::default().with_pm25_limit(f64::NAN);
        assert!(matches!(policy.check(&next, Some(&prev)), Continuity::AbnormalJump { .. }));
    }

    #[test]
    fn state_tracks_one_baseline_per_sensor() {
        let mut state = ContinuityState::new();
        assert!(state.is_empty());

        state.accept(reading(T0, 1.0, 2.0, 3.0));
        state.accept(Record::new("S2", T0, 1.0, 2.0, 3.0).unwrap());
        state.accept(reading(T1, 4.0, 5.0, 6.0));

        assert_eq!(state.len(), 2);
        assert_eq!(state.baseline("S1").unwrap().pm25(), 4.0);
        assert!(state.baseline("S3").is_none());

        let mut sensors: Vec<_> = state.sensors().collect();
        sensors.sort_unstable();
        assert_eq!(sensors, ["S1", "S2"]);

        state.clear();
        assert!(state.is_empty());
    }
}
