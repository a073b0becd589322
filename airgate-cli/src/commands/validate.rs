//! `airgate validate`

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use airgate_core::{ContinuityPolicy, Summary, Validator};

use super::SecretArgs;
use crate::input::{self, LineReader};
use crate::report::{Format, Reporter};

/// Arguments for `validate`
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSONL records with a signature field (`-` for stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub secret: SecretArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Exit with status 1 when any record is tampered or invalid
    #[arg(long)]
    pub strict: bool,

    /// Largest PM2.5 change between consecutive readings (μg/m³)
    #[arg(long, value_parser = parse_limit)]
    pub max_pm25_delta: Option<f64>,

    /// Largest PM10 change between consecutive readings (μg/m³)
    #[arg(long, value_parser = parse_limit)]
    pub max_pm10_delta: Option<f64>,

    /// Largest CO2 change between consecutive readings (ppm)
    #[arg(long, value_parser = parse_limit)]
    pub max_co2_delta: Option<f64>,
}

fn parse_limit(raw: &str) -> Result<f64, String> {
    let limit: f64 = raw.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    if limit.is_finite() && limit >= 0.0 {
        Ok(limit)
    } else {
        Err(format!("limit must be a finite, non-negative number, got {raw}"))
    }
}

impl ValidateArgs {
    fn policy(&self) -> ContinuityPolicy {
        let mut policy = ContinuityPolicy::default();
        if let Some(limit) = self.max_pm25_delta {
            policy = policy.with_pm25_limit(limit);
        }
        if let Some(limit) = self.max_pm10_delta {
            policy = policy.with_pm10_limit(limit);
        }
        if let Some(limit) = self.max_co2_delta {
            policy = policy.with_co2_limit(limit);
        }
        policy
    }
}

/// Entry point
pub fn run(args: &ValidateArgs) -> Result<ExitCode> {
    let reader = input::open(&args.input)?;
    let validator = Validator::new(args.secret.secret.clone()).with_policy(args.policy());

    let stdout = io::stdout();
    let summary = validate_stream(&validator, reader, stdout.lock(), args.format)?;

    if args.strict && summary.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Classify every line of `reader`, reporting each result as it is produced
pub fn validate_stream<R, W>(
    validator: &Validator,
    mut reader: LineReader<R>,
    out: W,
    format: Format,
) -> Result<Summary>
where
    R: BufRead,
    W: Write,
{
    let mut reporter = Reporter::new(out, format);
    let mut summary = Summary::new();

    for result in validator.stream(reader.by_ref()) {
        reporter.result(&result).context("failed to write result")?;
        summary.record(&result);
    }
    reporter.summary(&summary).context("failed to write summary")?;

    let stats = reader.stats();
    tracing::info!(
        records = stats.records,
        blank = stats.blank,
        read_errors = stats.errors,
        ok = summary.count(airgate_core::Status::Ok),
        tampered = summary.count(airgate_core::Status::Tampered),
        suspicious = summary.count(airgate_core::Status::Suspicious),
        invalid = summary.count(airgate_core::Status::Invalid),
        "validation finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use airgate_core::{integrity, Record, SecretKey, Status};
    use std::io::Cursor;

    fn signed_line(ts: &str, pm25: f64, key: &SecretKey) -> String {
        let record = Record::new("S1", ts, pm25, 20.0, 400.0).unwrap();
        let signature = integrity::sign(&record, key).unwrap();
        serde_json::json!({
            "sensor_id": "S1",
            "timestamp": ts,
            "pm25": pm25,
            "pm10": 20.0,
            "co2": 400.0,
            "signature": signature,
        })
        .to_string()
    }

    #[test]
    fn classifies_and_summarizes() {
        let key = SecretKey::from("cli-secret");
        let input = [
            signed_line("2024-03-01T10:00:00Z", 10.0, &key),
            String::new(),
            signed_line("2024-03-01T10:01:00Z", 20.0, &key),
            signed_line("2024-03-01T10:00:30Z", 20.0, &key),
            "{broken".to_string(),
        ]
        .join("\n");

        let validator = Validator::new(key);
        let mut out = Vec::new();
        let summary = validate_stream(
            &validator,
            LineReader::new(Cursor::new(input)),
            &mut out,
            Format::Text,
        )
        .unwrap();

        assert_eq!(summary.count(Status::Ok), 2);
        assert_eq!(summary.count(Status::Tampered), 1);
        assert_eq!(summary.count(Status::Invalid), 1);
        assert!(summary.has_failures());

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("#000 [ok] "));
        assert!(text.contains("#002 [tampered] timestamp is not monotonic"));
        assert!(text.contains("#003 [invalid] parse error: malformed record"));
    }

    #[test]
    fn threshold_flags_build_policy() {
        let args = ValidateArgs {
            input: PathBuf::from("-"),
            secret: SecretArgs { secret: SecretKey::from("x") },
            format: Format::Text,
            strict: false,
            max_pm25_delta: Some(5.0),
            max_pm10_delta: None,
            max_co2_delta: None,
        };
        let policy = args.policy();
        assert_eq!(policy.limit(airgate_core::Channel::Pm25), 5.0);
        assert_eq!(policy, ContinuityPolicy::default().with_pm25_limit(5.0));
    }

    #[test]
    fn limits_must_be_finite_and_non_negative() {
        assert_eq!(parse_limit("42.5"), Ok(42.5));
        assert_eq!(parse_limit("0"), Ok(0.0));
        for raw in ["NaN", "inf", "-inf", "-1", "lots"] {
            assert!(parse_limit(raw).is_err(), "{raw}");
        }
    }
}
