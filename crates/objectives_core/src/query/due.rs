//! Due-date predicate shared by in-memory and SQL evaluation.
//!
//! # Responsibility
//! - Reduce a calendar date to the components recurrence rules test.
//! - Define the due clauses once and derive both evaluators from them.
//!
//! # Invariants
//! - `DUE_CLAUSES` has exactly one entry per `RecurrenceKind`.
//! - `DueProbe::matches` and `DueProbe::sql_filter` walk the same table in
//!   the same order; an objective is due iff the clause for its kind holds.
//! - SQL filters reference `objectives.frequency_type` and the
//!   `objective_days` table from migration 0001.

use crate::model::recurrence::{RecurrenceKind, RecurrenceRule};
use chrono::{Datelike, NaiveDate};
use rusqlite::types::Value;

/// Date component a due clause compares against the rule's day set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateComponent {
    /// 1 = Sunday .. 7 = Saturday.
    WeekdayIndex,
    /// 1..=31.
    DayOfMonth,
}

#[derive(Debug, Clone, Copy)]
struct DueClause {
    kind: RecurrenceKind,
    /// `None` means the clause holds for every date.
    component: Option<DateComponent>,
}

const DUE_CLAUSES: &[DueClause] = &[
    DueClause {
        kind: RecurrenceKind::Always,
        component: None,
    },
    DueClause {
        kind: RecurrenceKind::Weekly,
        component: Some(DateComponent::WeekdayIndex),
    },
    DueClause {
        kind: RecurrenceKind::Monthly,
        component: Some(DateComponent::DayOfMonth),
    },
];

/// Date components needed to evaluate recurrence rules for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueProbe {
    date: NaiveDate,
    weekday_index: u8,
    day_of_month: u8,
}

/// Parameterized SQL boolean expression plus its positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    /// Parenthesized expression using `?` placeholders.
    pub clause: String,
    /// Bind values in placeholder order.
    pub params: Vec<Value>,
}

impl DueProbe {
    pub fn for_date(date: NaiveDate) -> Self {
        // Both values are bounded (1..=7, 1..=31), so the narrowing is lossless.
        Self {
            date,
            weekday_index: date.weekday().number_from_sunday() as u8,
            day_of_month: date.day() as u8,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Sunday-first, 1-based weekday index.
    pub fn weekday_index(&self) -> u8 {
        self.weekday_index
    }

    pub fn day_of_month(&self) -> u8 {
        self.day_of_month
    }

    fn component(&self, component: DateComponent) -> u8 {
        match component {
            DateComponent::WeekdayIndex => self.weekday_index,
            DateComponent::DayOfMonth => self.day_of_month,
        }
    }

    /// In-memory evaluator.
    pub fn matches(&self, rule: &RecurrenceRule) -> bool {
        DUE_CLAUSES
            .iter()
            .filter(|clause| clause.kind == rule.kind())
            .any(|clause| match clause.component {
                None => true,
                Some(component) => rule.has_day(self.component(component)),
            })
    }

    /// Pushdown evaluator over the `objectives`/`objective_days` schema.
    pub fn sql_filter(&self) -> SqlFilter {
        let mut parts = Vec::with_capacity(DUE_CLAUSES.len());
        let mut params = Vec::new();

        for clause in DUE_CLAUSES {
            params.push(Value::Integer(i64::from(clause.kind.code())));
            match clause.component {
                None => parts.push("objectives.frequency_type = ?".to_string()),
                Some(component) => {
                    parts.push(
                        "(objectives.frequency_type = ? AND EXISTS (
                            SELECT 1
                            FROM objective_days od
                            WHERE od.objective_id = objectives.id
                              AND od.day = ?
                        ))"
                        .to_string(),
                    );
                    params.push(Value::Integer(i64::from(self.component(component))));
                }
            }
        }

        SqlFilter {
            clause: format!("({})", parts.join(" OR ")),
            params,
        }
    }
}
