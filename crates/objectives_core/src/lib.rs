//! Core domain logic for the objectives tracker.
//! This crate is the single source of truth for recurrence and completion
//! invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::completion::{CompletionEntry, CompletionLog};
pub use model::objective::{Objective, ObjectiveId};
pub use model::recurrence::{RecurrenceKind, RecurrenceRule};
pub use model::tenant::TenantKey;
pub use model::validation::{ObjectiveError, ValidationError};
pub use query::due::{DueProbe, SqlFilter};
pub use query::selector::select_due_today;
pub use repo::objective_repo::{
    ObjectiveRepository, RepoError, RepoResult, SqliteObjectiveRepository,
};
pub use service::objective_service::{
    NewObjective, ObjectiveService, ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
