//! Per-status counts over a run

use std::collections::HashMap;

use serde::Serialize;

use crate::validator::{Status, ValidationResult};

/// Count of results per [`Status`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    counts: HashMap<Status, usize>,
}

impl Summary {
    /// Empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally a whole result sequence
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ValidationResult>) -> Self {
        results.into_iter().collect()
    }

    /// Count one result
    pub fn record(&mut self, result: &ValidationResult) {
        *self.counts.entry(result.status).or_default() += 1;
    }

    /// Results with `status`
    pub fn count(&self, status: Status) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// All results counted
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Any record tampered or invalid
    pub fn has_failures(&self) -> bool {
        self.count(Status::Tampered) > 0 || self.count(Status::Invalid) > 0
    }

    /// `(status, count)` pairs in reporting order, zero counts included
    pub fn iter(&self) -> impl Iterator<Item = (Status, usize)> + '_ {
        Status::ALL.into_iter().map(|status| (status, self.count(status)))
    }
}

impl<'a> FromIterator<&'a ValidationResult> for Summary {
    fn from_iter<T: IntoIterator<Item = &'a ValidationResult>>(iter: T) -> Self {
        let mut summary = Summary::new();
        for result in iter {
            summary.record(result);
        }
        summary
    }
}

impl<'a> Extend<&'a ValidationResult> for Summary {
    fn extend<T: IntoIterator<Item = &'a ValidationResult>>(&mut self, iter: T) {
        for result in iter {
            self.record(result);
        }
    }
}

/// Serializes as `{"ok":N,"tampered":N,"suspicious":N,"invalid":N}`
impl Serialize for Summary {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(Status::ALL.len()))?;
        for (status, count) in self.iter() {
            map.serialize_entry(status.as_str(), &count)?;
        }
        map.end()
    }
}
