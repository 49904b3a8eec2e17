//! Objective use-case service.
//!
//! # Responsibility
//! - Provide the tracker use cases: list, list due, get, create, update,
//!   delete, mark complete and mark incomplete.
//! - Delegate persistence to a tenant-scoped repository.
//!
//! # Invariants
//! - Every entry point takes the caller's `TenantKey`; nothing falls back to
//!   a shared scope.
//! - Completion changes are read-modify-write on one record; callers
//!   serialize concurrent writes to the same objective.
//! - Log events carry ids and counts only, never names or tenant keys.

use crate::model::objective::{Objective, ObjectiveId};
use crate::model::recurrence::RecurrenceRule;
use crate::model::tenant::TenantKey;
use crate::model::validation::{ObjectiveError, ValidationError};
use crate::query::selector::select_due_today;
use crate::repo::objective_repo::{ObjectiveRepository, RepoError};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for objective use cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input failed model validation.
    Validation(ValidationError),
    /// Update payload id differs from the target id.
    IdentityMismatch {
        target: ObjectiveId,
        payload: ObjectiveId,
    },
    /// Target objective does not exist for the tenant.
    NotFound(ObjectiveId),
    /// An objective with this id already exists.
    Conflict(ObjectiveId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but the read-back did not find the record.
    InconsistentState(&'static str),
}

impl ServiceError {
    /// Stable, metadata-only code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::IdentityMismatch { .. } => "identity_mismatch",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Repo(_) => "repo",
            Self::InconsistentState(_) => "inconsistent_state",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::IdentityMismatch { target, payload } => {
                write!(f, "id mismatch: target {target}, payload {payload}")
            }
            Self::NotFound(id) => write!(f, "objective not found: {id}"),
            Self::Conflict(id) => write!(f, "objective already exists: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent objective state: {details}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ObjectiveError> for ServiceError {
    fn from(value: ObjectiveError) -> Self {
        match value {
            ObjectiveError::Validation(err) => Self::Validation(err),
            ObjectiveError::IdentityMismatch { target, payload } => {
                Self::IdentityMismatch { target, payload }
            }
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Conflict(id) => Self::Conflict(id),
            RepoError::IdentityMismatch { target, payload } => {
                Self::IdentityMismatch { target, payload }
            }
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-supplied fields for a new objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewObjective {
    pub name: String,
    pub description: String,
    pub recurrence: RecurrenceRule,
}

/// Objective service facade over repository implementations.
pub struct ObjectiveService<R: ObjectiveRepository> {
    repo: R,
}

impl<R: ObjectiveRepository> ObjectiveService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every objective owned by `tenant`.
    pub fn list_objectives(&self, tenant: &TenantKey) -> ServiceResult<Vec<Objective>> {
        let items = self.repo.fetch_all(tenant)?;
        info!(
            "event=objective_list module=service status=ok count={}",
            items.len()
        );
        Ok(items)
    }

    /// Lists objectives due on `date`, filtered inside storage.
    pub fn list_due_on(&self, tenant: &TenantKey, date: NaiveDate) -> ServiceResult<Vec<Objective>> {
        let items = self.repo.fetch_due_on(tenant, date)?;
        info!(
            "event=objective_list_due module=service status=ok evaluator=storage date={date} count={}",
            items.len()
        );
        Ok(items)
    }

    /// Lists objectives due on `today`, filtered in memory over the full set.
    ///
    /// Yields the same records as `list_due_on` for the same date.
    pub fn list_due_today(
        &self,
        tenant: &TenantKey,
        today: NaiveDate,
    ) -> ServiceResult<Vec<Objective>> {
        let all = self.repo.fetch_all(tenant)?;
        let items: Vec<Objective> = select_due_today(tenant, &all, today).cloned().collect();
        info!(
            "event=objective_list_due module=service status=ok evaluator=memory date={today} count={}",
            items.len()
        );
        Ok(items)
    }

    /// Gets one objective by id.
    pub fn get_objective(&self, tenant: &TenantKey, id: ObjectiveId) -> ServiceResult<Objective> {
        Ok(self.repo.fetch_by_id(tenant, id)?)
    }

    /// Creates one objective with a generated id and an empty history.
    pub fn create_objective(
        &self,
        tenant: &TenantKey,
        request: NewObjective,
    ) -> ServiceResult<Objective> {
        let result = Objective::create(
            request.name,
            request.description,
            request.recurrence,
            tenant.clone(),
        )
        .map_err(ServiceError::from)
        .and_then(|objective| {
            let id = self.repo.insert(&objective)?;
            self.read_back(tenant, id, "created objective not found in read-back")
        });

        match &result {
            Ok(objective) => info!(
                "event=objective_create module=service status=ok objective_id={}",
                objective.id()
            ),
            Err(err) => warn!(
                "event=objective_create module=service status=error error_code={}",
                err.code()
            ),
        }
        result
    }

    /// Replaces the stored objective `id` with `updated`.
    ///
    /// # Errors
    /// - `Validation` when `updated.name` is blank.
    /// - `IdentityMismatch` when `updated.id()` differs from `id`.
    /// - `NotFound` when `id` does not exist for `tenant`.
    pub fn update_objective(
        &self,
        tenant: &TenantKey,
        id: ObjectiveId,
        updated: Objective,
    ) -> ServiceResult<Objective> {
        let result = ensure_update_target(id, &updated).and_then(|()| {
            self.modify(tenant, id, |current| {
                current.replace(updated)?;
                Ok(())
            })
        });
        log_write("objective_update", id, &result);
        result
    }

    /// Deletes objective `id` and its completion history.
    pub fn delete_objective(&self, tenant: &TenantKey, id: ObjectiveId) -> ServiceResult<()> {
        let result = self.repo.delete_by_id(tenant, id).map_err(ServiceError::from);
        log_write("objective_delete", id, &result);
        result
    }

    /// Records `date` as completed.
    pub fn mark_completed(
        &self,
        tenant: &TenantKey,
        id: ObjectiveId,
        date: NaiveDate,
    ) -> ServiceResult<Objective> {
        self.set_completion(tenant, id, date, true)
    }

    /// Records `date` as explicitly not completed.
    pub fn mark_incomplete(
        &self,
        tenant: &TenantKey,
        id: ObjectiveId,
        date: NaiveDate,
    ) -> ServiceResult<Objective> {
        self.set_completion(tenant, id, date, false)
    }

    /// Upserts the completion flag for `date` and persists the record.
    pub fn set_completion(
        &self,
        tenant: &TenantKey,
        id: ObjectiveId,
        date: NaiveDate,
        completed: bool,
    ) -> ServiceResult<Objective> {
        let result = self.modify(tenant, id, |current| {
            current.set_completion(date, completed);
            Ok(())
        });
        match &result {
            Ok(_) => info!(
                "event=objective_completion module=service status=ok objective_id={id} date={date} completed={completed}"
            ),
            Err(err) => warn!(
                "event=objective_completion module=service status=error objective_id={id} error_code={}",
                err.code()
            ),
        }
        result
    }

    fn modify(
        &self,
        tenant: &TenantKey,
        id: ObjectiveId,
        change: impl FnOnce(&mut Objective) -> ServiceResult<()>,
    ) -> ServiceResult<Objective> {
        let mut current = self.repo.fetch_by_id(tenant, id)?;
        change(&mut current)?;
        self.repo.replace_by_id(tenant, id, &current)?;
        self.read_back(tenant, id, "updated objective not found in read-back")
    }

    fn read_back(
        &self,
        tenant: &TenantKey,
        id: ObjectiveId,
        details: &'static str,
    ) -> ServiceResult<Objective> {
        match self.repo.fetch_by_id(tenant, id) {
            Ok(objective) => Ok(objective),
            Err(RepoError::NotFound(_)) => Err(ServiceError::InconsistentState(details)),
            Err(err) => Err(err.into()),
        }
    }
}

/// Payload checks that run before storage is touched.
fn ensure_update_target(id: ObjectiveId, updated: &Objective) -> ServiceResult<()> {
    updated.validate()?;
    if updated.id() != id {
        return Err(ServiceError::IdentityMismatch {
            target: id,
            payload: updated.id(),
        });
    }
    Ok(())
}

fn log_write<T>(event: &str, id: ObjectiveId, result: &ServiceResult<T>) {
    match result {
        Ok(_) => info!("event={event} module=service status=ok objective_id={id}"),
        Err(err) => warn!(
            "event={event} module=service status=error objective_id={id} error_code={}",
            err.code()
        ),
    }
}
