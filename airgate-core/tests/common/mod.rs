//! Shared fixtures for integration tests
//!
//! Builds signed telemetry the way a fielded node would: JSON objects with a
//! `signature` computed over the canonical payload.

#![allow(dead_code)]

use airgate_core::{integrity, Record, SecretKey};
use serde_json::{json, Value};

/// Secret shared by every fixture
pub const SECRET: &str = "integration-secret";

/// Start of every scenario
pub const T0: &str = "2024-03-01T10:00:00Z";

/// Key for `SECRET`
pub fn key() -> SecretKey {
    SecretKey::from(SECRET)
}

/// RFC 3339 text `seconds` after `T0`
pub fn at(seconds: i64) -> String {
    let base = chrono::DateTime::parse_from_rfc3339(T0).unwrap();
    (base + chrono::TimeDelta::seconds(seconds))
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Builder for one telemetry line
#[derive(Debug, Clone)]
pub struct Reading {
    pub sensor_id: String,
    pub timestamp: String,
    pub pm25: f64,
    pub pm10: f64,
    pub co2: f64,
}

impl Reading {
    /// Typical clean-air reading for `sensor_id` at `T0`
    pub fn new(sensor_id: &str) -> Self {
        Self {
            sensor_id: sensor_id.to_string(),
            timestamp: T0.to_string(),
            pm25: 12.0,
            pm10: 20.0,
            co2: 420.0,
        }
    }

    pub fn at(mut self, seconds: i64) -> Self {
        self.timestamp = at(seconds);
        self
    }

    pub fn pm25(mut self, value: f64) -> Self {
        self.pm25 = value;
        self
    }

    pub fn pm10(mut self, value: f64) -> Self {
        self.pm10 = value;
        self
    }

    pub fn co2(mut self, value: f64) -> Self {
        self.co2 = value;
        self
    }

    pub fn record(&self) -> Record {
        Record::new(&self.sensor_id, &self.timestamp, self.pm25, self.pm10, self.co2).unwrap()
    }

    /// Signature a legitimate producer would attach
    pub fn signature(&self) -> String {
        integrity::sign(&self.record(), &key()).unwrap()
    }

    /// Unsigned JSON object
    pub fn json(&self) -> Value {
        json!({
            "sensor_id": self.sensor_id,
            "timestamp": self.timestamp,
            "pm25": self.pm25,
            "pm10": self.pm10,
            "co2": self.co2,
        })
    }

    /// JSON object carrying a valid signature
    pub fn signed(&self) -> Value {
        let mut value = self.json();
        value["signature"] = Value::String(self.signature());
        value
    }
}

/// Replace one field of a signed object without re-signing
pub fn tamper(mut signed: Value, field: &str, replacement: Value) -> Value {
    signed[field] = replacement;
    signed
}
