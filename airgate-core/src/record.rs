//! Telemetry record schema
//!
//! ## Overview
//!
//! A record is one line of sensor telemetry: identity, timestamp, three
//! readings and the producer's integrity signature. Input arrives loosely
//! typed (JSON objects from files, sockets or queues), so this module owns the
//! single fallible step that turns raw input into a typed [`Record`].
//!
//! ## Wire Format
//!
//! ```json
//! {"sensor_id":"S1","timestamp":"2024-03-01T10:00:00Z","pm25":12.5,"pm10":20.0,"co2":415.0,"signature":"9f2c..."}
//! ```
//!
//! | Field       | Type   | Rule |
//! |-------------|--------|------|
//! | `sensor_id` | string | non-empty |
//! | `timestamp` | string | ISO 8601 with offset (`Z` = UTC) |
//! | `pm25`      | number | finite, μg/m³ |
//! | `pm10`      | number | finite, μg/m³ |
//! | `co2`       | number | finite, ppm |
//! | `signature` | string | optional, hex HMAC-SHA256 |
//!
//! Any other field is ignored. A `signature` of any non-string type carries no
//! claim and is treated as absent, which verification reports as tampered.
//!
//! ## Raw Input
//!
//! [`RawRecord`] is implemented for every shape a reader is likely to hand
//! over, including `Result<T, E>` so that a line which could not even be read
//! becomes an `invalid` classification at its position instead of ending the
//! run.

use core::fmt;

use serde_json::{Map, Value};

use crate::errors::{FieldError, FieldResult};
use crate::time::Timestamp;

/// Field names, shared with the canonical encoder
pub(crate) mod fields {
    pub const SENSOR_ID: &str = "sensor_id";
    pub const TIMESTAMP: &str = "timestamp";
    pub const PM25: &str = "pm25";
    pub const PM10: &str = "pm10";
    pub const CO2: &str = "co2";
    pub const SIGNATURE: &str = "signature";
}

/// One validated telemetry reading
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    sensor_id: String,
    timestamp: Timestamp,
    pm25: f64,
    pm10: f64,
    co2: f64,
    signature: Option<String>,
}

impl Record {
    /// Build a record from typed values, without a signature
    ///
    /// Applies the same rules as parsing: non-empty id, offset-qualified
    /// timestamp, finite readings.
    pub fn new(
        sensor_id: impl Into<String>,
        timestamp: &str,
        pm25: f64,
        pm10: f64,
        co2: f64,
    ) -> FieldResult<Self> {
        let sensor_id = sensor_id.into();
        if sensor_id.is_empty() {
            return Err(FieldError::Empty { field: fields::SENSOR_ID });
        }

        Ok(Self {
            sensor_id,
            timestamp: Timestamp::parse(timestamp)?,
            pm25: finite(fields::PM25, pm25)?,
            pm10: finite(fields::PM10, pm10)?,
            co2: finite(fields::CO2, co2)?,
            signature: None,
        })
    }

    /// Attach the claimed signature
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Coerce a decoded JSON value into a record
    pub fn from_value(value: &Value) -> FieldResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            FieldError::Malformed(format!("expected a JSON object, found {}", kind(value)))
        })?;

        let sensor_id = string_field(object, fields::SENSOR_ID)?;
        let timestamp = string_field(object, fields::TIMESTAMP)?;

        let mut record = Self::new(
            sensor_id,
            timestamp,
            reading_field(object, fields::PM25)?,
            reading_field(object, fields::PM10)?,
            reading_field(object, fields::CO2)?,
        )?;

        record.signature = object
            .get(fields::SIGNATURE)
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(record)
    }

    /// Parse one line of JSON text
    pub fn from_json(line: &str) -> FieldResult<Self> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| FieldError::Malformed(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Opaque sensor identity
    pub fn sensor_id(&self) -> &str {
        &self.sensor_id
    }

    /// When the reading was taken
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// PM2.5 concentration
    pub fn pm25(&self) -> f64 {
        self.pm25
    }

    /// PM10 concentration
    pub fn pm10(&self) -> f64 {
        self.pm10
    }

    /// CO2 concentration
    pub fn co2(&self) -> f64 {
        self.co2
    }

    /// Claimed signature, if the producer supplied one
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} pm25={} pm10={} co2={}",
            self.sensor_id, self.timestamp, self.pm25, self.pm10, self.co2
        )
    }
}

/// Raw input the validator can coerce into a [`Record`]
pub trait RawRecord {
    /// Run the schema step
    fn into_record(self) -> FieldResult<Record>;
}

impl RawRecord for Record {
    fn into_record(self) -> FieldResult<Record> {
        Ok(self)
    }
}

impl RawRecord for &Record {
    fn into_record(self) -> FieldResult<Record> {
        Ok(self.clone())
    }
}

impl RawRecord for Value {
    fn into_record(self) -> FieldResult<Record> {
        Record::from_value(&self)
    }
}

impl RawRecord for &Value {
    fn into_record(self) -> FieldResult<Record> {
        Record::from_value(self)
    }
}

impl RawRecord for &str {
    fn into_record(self) -> FieldResult<Record> {
        Record::from_json(self)
    }
}

impl RawRecord for String {
    fn into_record(self) -> FieldResult<Record> {
        Record::from_json(&self)
    }
}

/// Upstream failures (unreadable line, bad encoding) become malformed records
impl<T, E> RawRecord for Result<T, E>
where
    T: RawRecord,
    E: fmt::Display,
{
    fn into_record(self) -> FieldResult<Record> {
        match self {
            Ok(raw) => raw.into_record(),
            Err(e) => Err(FieldError::Malformed(e.to_string())),
        }
    }
}

fn string_field<'a>(object: &'a Map<String, Value>, field: &'static str) -> FieldResult<&'a str> {
    match object.get(field) {
        None => Err(FieldError::Missing { field }),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(FieldError::WrongType { field, expected: "a string" }),
    }
}

fn reading_field(object: &Map<String, Value>, field: &'static str) -> FieldResult<f64> {
    match object.get(field) {
        None => Err(FieldError::Missing { field }),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or(FieldError::NotFinite { field }),
        Some(_) => Err(FieldError::WrongType { field, expected: "a number" }),
    }
}

fn finite(field: &'static str, value: f64) -> FieldResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FieldError::NotFinite { field })
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
