//! `airgate sign`
//!
//! Producer-side helper: recompute the signature of every record and write
//! the stream back out. Extra fields are kept as they are. Lines that are not
//! valid records are skipped with a warning; nothing is repaired.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use airgate_core::{integrity, Record, SecretKey};

use super::SecretArgs;
use crate::input::{self, LineReader};

/// Arguments for `sign`
#[derive(Args, Debug)]
pub struct SignArgs {
    /// JSONL records to sign (`-` for stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub secret: SecretArgs,
}

/// Entry point
pub fn run(args: &SignArgs) -> Result<ExitCode> {
    let reader = input::open(&args.input)?;
    let stdout = io::stdout();
    let skipped = sign_stream(&args.secret.secret, reader, stdout.lock())?;

    if skipped > 0 {
        tracing::warn!(skipped, "some lines were not signed");
    }
    Ok(ExitCode::SUCCESS)
}

/// Sign every record of `reader`; returns how many lines were skipped
pub fn sign_stream<R, W>(key: &SecretKey, reader: LineReader<R>, mut out: W) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut skipped = 0;

    for (line_no, line) in reader.enumerate() {
        match sign_line(key, line) {
            Ok(value) => {
                serde_json::to_writer(&mut out, &value).context("failed to write record")?;
                writeln!(out).context("failed to write record")?;
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!(record = line_no, "skipping: {e:#}");
            }
        }
    }

    out.flush().context("failed to flush output")?;
    Ok(skipped)
}

fn sign_line(key: &SecretKey, line: io::Result<String>) -> Result<Value> {
    let line = line.context("unreadable line")?;
    let mut value: Value = serde_json::from_str(&line).context("not JSON")?;
    let record = Record::from_value(&value)?;
    let signature = integrity::sign(&record, key)?;

    // from_value only succeeds on objects
    if let Some(object) = value.as_object_mut() {
        object.insert("signature".to_string(), Value::String(signature));
    }
    Ok(value)
}
