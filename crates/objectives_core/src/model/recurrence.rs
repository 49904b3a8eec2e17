//! Recurrence rule model.
//!
//! # Responsibility
//! - Encode when an objective is due.
//! - Own the day-set mutation primitives (membership test and toggle).
//!
//! # Invariants
//! - `days` never holds duplicates and never holds a value outside
//!   `kind.day_range()`.
//! - Weekly day indices are 1-based and Sunday-first: 1 = Sunday,
//!   7 = Saturday.
//! - Due evaluation is delegated to `query::due::DueProbe` so in-memory and
//!   SQL evaluation share one clause table.

use super::validation::ValidationError;
use crate::query::due::DueProbe;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// Recurrence category. Serialized as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RecurrenceKind {
    /// Due every day. Code `0`.
    Always,
    /// Due on specific weekdays. Code `1`.
    Weekly,
    /// Due on specific days of the month. Code `2`.
    Monthly,
}

impl RecurrenceKind {
    pub const ALL: [RecurrenceKind; 3] = [Self::Always, Self::Weekly, Self::Monthly];

    /// Stable integer code used on the wire and in storage.
    pub fn code(self) -> u8 {
        match self {
            Self::Always => 0,
            Self::Weekly => 1,
            Self::Monthly => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Always),
            1 => Some(Self::Weekly),
            2 => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Inclusive range of day indices accepted by this kind.
    ///
    /// `Always` never consults its days, but keeps the widest range so a
    /// payload carrying leftover month days still round-trips.
    pub fn day_range(self) -> RangeInclusive<u8> {
        match self {
            Self::Weekly => 1..=7,
            Self::Always | Self::Monthly => 1..=31,
        }
    }
}

impl Display for RecurrenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Always => "always",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        };
        f.write_str(label)
    }
}

impl From<RecurrenceKind> for u8 {
    fn from(value: RecurrenceKind) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for RecurrenceKind {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(value).ok_or(ValidationError::UnknownRecurrenceKind(value))
    }
}

/// Due-date predicate attached to an objective.
///
/// Serialized as `{ "type": <code>, "days": [..] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecurrenceRuleWire")]
pub struct RecurrenceRule {
    #[serde(rename = "type")]
    kind: RecurrenceKind,
    days: BTreeSet<u8>,
}

#[derive(Deserialize)]
struct RecurrenceRuleWire {
    #[serde(rename = "type")]
    kind: RecurrenceKind,
    #[serde(default)]
    days: Option<Vec<u8>>,
}

impl TryFrom<RecurrenceRuleWire> for RecurrenceRule {
    type Error = ValidationError;

    fn try_from(value: RecurrenceRuleWire) -> Result<Self, Self::Error> {
        Self::new(value.kind, value.days.unwrap_or_default())
    }
}

impl RecurrenceRule {
    /// Builds a rule, rejecting day indices outside `kind.day_range()`.
    ///
    /// Repeated values collapse into one set member.
    pub fn new(
        kind: RecurrenceKind,
        days: impl IntoIterator<Item = u8>,
    ) -> Result<Self, ValidationError> {
        let mut rule = Self {
            kind,
            days: BTreeSet::new(),
        };
        for day in days {
            rule.toggle_day(day, true)?;
        }
        Ok(rule)
    }

    /// Rule that is due every day.
    pub fn always() -> Self {
        Self {
            kind: RecurrenceKind::Always,
            days: BTreeSet::new(),
        }
    }

    /// Rule due on the given weekday indices (1 = Sunday .. 7 = Saturday).
    pub fn weekly(days: impl IntoIterator<Item = u8>) -> Result<Self, ValidationError> {
        Self::new(RecurrenceKind::Weekly, days)
    }

    /// Rule due on the given days of the month (1..=31).
    pub fn monthly(days: impl IntoIterator<Item = u8>) -> Result<Self, ValidationError> {
        Self::new(RecurrenceKind::Monthly, days)
    }

    pub fn kind(&self) -> RecurrenceKind {
        self.kind
    }

    /// Day indices in ascending order.
    pub fn days(&self) -> impl Iterator<Item = u8> + '_ {
        self.days.iter().copied()
    }

    pub fn has_day(&self, index: u8) -> bool {
        self.days.contains(&index)
    }

    /// Sets membership of `index` to `present`.
    ///
    /// Idempotent. Adding an index outside `kind.day_range()` fails with
    /// `DayOutOfRange` and leaves the rule unchanged; removing any index is
    /// always accepted.
    pub fn toggle_day(&mut self, index: u8, present: bool) -> Result<(), ValidationError> {
        if !present {
            self.days.remove(&index);
            return Ok(());
        }
        if !self.kind.day_range().contains(&index) {
            return Err(ValidationError::DayOutOfRange {
                kind: self.kind,
                day: index,
            });
        }
        self.days.insert(index);
        Ok(())
    }

    /// Returns whether this rule is due on `date`.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        DueProbe::for_date(date).matches(self)
    }
}
