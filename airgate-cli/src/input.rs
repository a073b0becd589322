//! Line-delimited record input
//!
//! One JSON object per line, from a file or stdin (`-`). Blank lines are
//! skipped. A line that cannot be decoded is still yielded, as an `Err`, so
//! the validator can classify it as invalid at its position.
//!
//! ## Error Handling
//!
//! - Invalid UTF-8: the offending line is consumed, reported, and reading
//!   continues with the next line
//! - Any other I/O error: reported once, then the stream ends, since the
//!   underlying reader cannot be trusted to make progress

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

use anyhow::{Context, Result};

/// Reader statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineStats {
    /// Lines handed to the caller, including failed ones
    pub records: usize,
    /// Blank lines skipped
    pub blank: usize,
    /// Lines that failed to decode
    pub errors: usize,
}

/// Iterator over the non-blank lines of an input
pub struct LineReader<R> {
    lines: Lines<R>,
    stats: LineStats,
    halted: bool,
}

impl<R: BufRead> LineReader<R> {
    /// Wrap any buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            stats: LineStats::default(),
            halted: false,
        }
    }

    /// Statistics so far
    pub fn stats(&self) -> &LineStats {
        &self.stats
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }

        loop {
            match self.lines.next()? {
                Ok(line) if line.trim().is_empty() => self.stats.blank += 1,
                Ok(line) => {
                    self.stats.records += 1;
                    return Some(Ok(line));
                }
                Err(e) => {
                    self.stats.records += 1;
                    self.stats.errors += 1;
                    self.halted = e.kind() != io::ErrorKind::InvalidData;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Open `path` for reading; `-` means stdin
pub fn open(path: &Path) -> Result<LineReader<Box<dyn BufRead>>> {
    let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(path)
            .with_context(|| format!("failed to open input {}", path.display()))?;
        Box::new(BufReader::new(file))
    };

    Ok(LineReader::new(reader))
}
