//! Objective domain model.
//!
//! # Responsibility
//! - Define the tracked record: identity, tenant scope, display fields,
//!   recurrence and completion log.
//! - Provide due evaluation and completion mutation helpers.
//!
//! # Invariants
//! - `id` and `tenant_key` are fixed at construction; `replace` never
//!   changes either.
//! - `name` is non-blank whenever a record passes `validate()`.
//! - The completion log holds at most one entry per date.
//!
//! # See also
//! - `model::recurrence` for the due-date predicate.

use super::completion::{CompletionEntry, CompletionLog};
use super::recurrence::RecurrenceRule;
use super::tenant::TenantKey;
use super::validation::{ObjectiveError, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one objective.
pub type ObjectiveId = Uuid;

/// Recurring task tracked per calendar date.
///
/// Wire field names follow the document shape
/// `{id, partitionKey, name, description, frequency, completionHistory}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    id: ObjectiveId,
    #[serde(rename = "partitionKey")]
    tenant_key: TenantKey,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "frequency")]
    pub recurrence: RecurrenceRule,
    #[serde(rename = "completionHistory", default)]
    completion_log: CompletionLog,
}

impl Objective {
    /// Creates a new objective with a generated id and an empty log.
    ///
    /// # Errors
    /// - `ValidationError::EmptyName` when `name` is blank.
    pub fn create(
        name: impl Into<String>,
        description: impl Into<String>,
        recurrence: RecurrenceRule,
        tenant_key: TenantKey,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        ensure_name(&name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            tenant_key,
            name,
            description: description.into(),
            recurrence,
            completion_log: CompletionLog::new(),
        })
    }

    /// Builds an objective around a caller-provided id.
    ///
    /// Used for update payloads and storage reads where identity already
    /// exists. The name is not checked here; `validate()` and `replace()`
    /// enforce it at the write boundary.
    ///
    /// # Errors
    /// - `ValidationError::NilId` when `id` is nil.
    pub fn with_id(
        id: ObjectiveId,
        tenant_key: TenantKey,
        name: impl Into<String>,
        description: impl Into<String>,
        recurrence: RecurrenceRule,
        completion_log: CompletionLog,
    ) -> Result<Self, ValidationError> {
        if id.is_nil() {
            return Err(ValidationError::NilId);
        }
        Ok(Self {
            id,
            tenant_key,
            name: name.into(),
            description: description.into(),
            recurrence,
            completion_log,
        })
    }

    pub fn id(&self) -> ObjectiveId {
        self.id
    }

    pub fn tenant_key(&self) -> &TenantKey {
        &self.tenant_key
    }

    pub fn completion_log(&self) -> &CompletionLog {
        &self.completion_log
    }

    /// Completion entries in ascending date order.
    pub fn completion_entries(&self) -> impl Iterator<Item = CompletionEntry> + '_ {
        self.completion_log.entries()
    }

    pub fn completion_len(&self) -> usize {
        self.completion_log.len()
    }

    /// Checks invariants required before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId);
        }
        ensure_name(&self.name)
    }

    /// Returns whether the recurrence makes this objective due on `date`.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.recurrence.is_due_on(date)
    }

    /// True only when `date` has an explicit `completed = true` entry.
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completion_log.is_completed_on(date)
    }

    /// Upserts the completion flag for `date`. Never removes entries.
    pub fn set_completion(&mut self, date: NaiveDate, completed: bool) {
        self.completion_log.set(date, completed);
    }

    /// Replaces every mutable field with the values from `updated`.
    ///
    /// The tenant key of `self` is kept; the payload's tenant key is ignored.
    ///
    /// # Errors
    /// - `Validation(EmptyName)` when `updated.name` is blank.
    /// - `IdentityMismatch` when `updated.id` differs from `self.id`.
    ///
    /// On error `self` is left untouched.
    pub fn replace(&mut self, updated: Objective) -> Result<(), ObjectiveError> {
        ensure_name(&updated.name)?;
        if updated.id != self.id {
            return Err(ObjectiveError::IdentityMismatch {
                target: self.id,
                payload: updated.id,
            });
        }

        let Objective {
            name,
            description,
            recurrence,
            completion_log,
            ..
        } = updated;
        self.name = name;
        self.description = description;
        self.recurrence = recurrence;
        self.completion_log = completion_log;
        Ok(())
    }
}

fn ensure_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}
