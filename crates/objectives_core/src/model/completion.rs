//! Per-date completion log.
//!
//! # Responsibility
//! - Record whether an objective was completed on a calendar date.
//! - Keep upsert semantics so repeated writes are idempotent.
//!
//! # Invariants
//! - At most one entry per calendar date.
//! - Entries are never removed; marking incomplete stores an explicit `false`.
//! - Serialized form is an array of `{date, completed}` ordered by date.

use super::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One serialized completion record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub date: NaiveDate,
    pub completed: bool,
}

/// Sparse date -> completed mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CompletionEntry>", into = "Vec<CompletionEntry>")]
pub struct CompletionLog {
    entries: BTreeMap<NaiveDate, bool>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a log from serialized entries, rejecting repeated dates.
    pub fn from_entries(
        entries: impl IntoIterator<Item = CompletionEntry>,
    ) -> Result<Self, ValidationError> {
        let mut log = Self::new();
        for entry in entries {
            if log.entries.insert(entry.date, entry.completed).is_some() {
                return Err(ValidationError::DuplicateCompletionDate(entry.date));
            }
        }
        Ok(log)
    }

    /// Recorded flag for `date`, or `None` when nothing was recorded.
    pub fn get(&self, date: NaiveDate) -> Option<bool> {
        self.entries.get(&date).copied()
    }

    /// Absence of an entry means "not completed".
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.get(date).unwrap_or(false)
    }

    /// Upserts the flag for `date`.
    pub fn set(&mut self, date: NaiveDate, completed: bool) {
        self.entries.insert(date, completed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending date order.
    pub fn entries(&self) -> impl Iterator<Item = CompletionEntry> + '_ {
        self.entries
            .iter()
            .map(|(date, completed)| CompletionEntry {
                date: *date,
                completed: *completed,
            })
    }
}

impl TryFrom<Vec<CompletionEntry>> for CompletionLog {
    type Error = ValidationError;

    fn try_from(value: Vec<CompletionEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(value)
    }
}

impl From<CompletionLog> for Vec<CompletionEntry> {
    fn from(value: CompletionLog) -> Self {
        value.entries().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{CompletionEntry, CompletionLog};
    use crate::model::validation::ValidationError;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_entry_reads_as_not_completed() {
        let log = CompletionLog::new();
        assert_eq!(log.get(date(2024, 1, 1)), None);
        assert!(!log.is_completed_on(date(2024, 1, 1)));
    }

    #[test]
    fn from_entries_rejects_repeated_dates() {
        let entry = CompletionEntry {
            date: date(2024, 3, 5),
            completed: true,
        };
        let err = CompletionLog::from_entries([entry, entry]).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateCompletionDate(date(2024, 3, 5)));
    }

    #[test]
    fn entries_are_date_ordered_regardless_of_write_order() {
        let mut log = CompletionLog::new();
        log.set(date(2024, 2, 1), true);
        log.set(date(2024, 1, 1), false);
        let dates: Vec<_> = log.entries().map(|entry| entry.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 2, 1)]);
    }
}
