//! Objective domain model.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//! - Keep recurrence evaluation and completion tracking free of storage
//!   concerns.
//!
//! # Invariants
//! - Every objective is identified by a stable `ObjectiveId` and scoped to
//!   exactly one `TenantKey`.
//! - Completion history holds at most one entry per calendar date.

pub mod completion;
pub mod objective;
pub mod recurrence;
pub mod tenant;
pub mod validation;
