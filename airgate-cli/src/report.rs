//! Result formatting
//!
//! Text output mirrors what operators already grep for:
//!
//! ```text
//! #000 [ok] signature valid; first reading for sensor
//! #001 [tampered] HMAC signature mismatch
//!
//! Summary:
//! - ok: 1
//! - tampered: 1
//! - suspicious: 0
//! - invalid: 0
//! ```
//!
//! JSON output is one object per result followed by `{"summary":{...}}`.

use std::io::{self, Write};

use airgate_core::{Summary, ValidationResult};
use clap::ValueEnum;
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable lines and a summary block
    #[default]
    Text,
    /// JSON Lines
    Json,
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    summary: &'a Summary,
}

/// Writes results as they are produced
pub struct Reporter<W> {
    out: W,
    format: Format,
}

impl<W: Write> Reporter<W> {
    /// Report to `out` in `format`
    pub fn new(out: W, format: Format) -> Self {
        Self { out, format }
    }

    /// Emit one result
    pub fn result(&mut self, result: &ValidationResult) -> io::Result<()> {
        match self.format {
            Format::Text => writeln!(
                self.out,
                "#{:03} [{}] {}",
                result.index, result.status, result.reason
            ),
            Format::Json => {
                serde_json::to_writer(&mut self.out, result)?;
                writeln!(self.out)
            }
        }
    }

    /// Emit the closing summary and flush
    pub fn summary(&mut self, summary: &Summary) -> io::Result<()> {
        match self.format {
            Format::Text => {
                writeln!(self.out)?;
                writeln!(self.out, "Summary:")?;
                for (status, count) in summary.iter() {
                    writeln!(self.out, "- {status}: {count}")?;
                }
            }
            Format::Json => {
                // Streamed rather than built as a Value, which would sort the keys
                serde_json::to_writer(&mut self.out, &SummaryLine { summary })?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }

    /// Recover the writer
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airgate_core::Status;

    fn results() -> Vec<ValidationResult> {
        vec![
            ValidationResult { index: 0, status: Status::Ok, reason: "fine".into() },
            ValidationResult { index: 1, status: Status::Invalid, reason: "parse error: x".into() },
        ]
    }

    fn render(format: Format) -> String {
        let mut reporter = Reporter::new(Vec::new(), format);
        let results = results();
        for result in &results {
            reporter.result(result).unwrap();
        }
        reporter.summary(&Summary::from_results(&results)).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn text_layout() {
        assert_eq!(
            render(Format::Text),
            "#000 [ok] fine\n#001 [invalid] parse error: x\n\nSummary:\n- ok: 1\n- tampered: 0\n- suspicious: 0\n- invalid: 1\n"
        );
    }

    #[test]
    fn json_lines_layout() {
        let rendered = render(Format::Json);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"index":0,"status":"ok","reason":"fine"}"#);
        assert_eq!(
            lines[2],
            r#"{"summary":{"ok":1,"tampered":0,"suspicious":0,"invalid":1}}"#
        );
    }
}
