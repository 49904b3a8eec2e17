//! Validation errors shared by the objective domain model.
//!
//! # Responsibility
//! - Name every way a model value can be rejected at a construction or
//!   mutation boundary.
//!
//! # Invariants
//! - Validation errors carry enough metadata to explain the rejection without
//!   echoing user-authored text (names, descriptions).

use super::objective::ObjectiveId;
use super::recurrence::RecurrenceKind;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reasons for objective model values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Objective name is empty or whitespace-only.
    EmptyName,
    /// Objective id is the nil UUID.
    NilId,
    /// Recurrence day index is outside the range allowed by its kind.
    DayOutOfRange { kind: RecurrenceKind, day: u8 },
    /// Serialized recurrence type code is not one of `0|1|2`.
    UnknownRecurrenceKind(u8),
    /// Completion history contains the same calendar date twice.
    DuplicateCompletionDate(NaiveDate),
    /// Tenant key is empty, too long, or contains control characters.
    InvalidTenantKey(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "objective name is required"),
            Self::NilId => write!(f, "objective id must not be nil"),
            Self::DayOutOfRange { kind, day } => {
                let range = kind.day_range();
                write!(
                    f,
                    "day {day} is out of range {}..={} for {kind} recurrence",
                    range.start(),
                    range.end()
                )
            }
            Self::UnknownRecurrenceKind(code) => {
                write!(f, "unknown recurrence type `{code}`; expected 0|1|2")
            }
            Self::DuplicateCompletionDate(date) => {
                write!(f, "completion history has more than one entry for {date}")
            }
            Self::InvalidTenantKey(reason) => write!(f, "invalid tenant key: {reason}"),
        }
    }
}

impl Error for ValidationError {}

/// Errors raised by whole-record objective mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectiveError {
    /// The replacement payload failed validation.
    Validation(ValidationError),
    /// The replacement payload targets a different objective.
    IdentityMismatch {
        target: ObjectiveId,
        payload: ObjectiveId,
    },
}

impl Display for ObjectiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::IdentityMismatch { target, payload } => {
                write!(f, "id mismatch: target {target}, payload {payload}")
            }
        }
    }
}

impl Error for ObjectiveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::IdentityMismatch { .. } => None,
        }
    }
}

impl From<ValidationError> for ObjectiveError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
