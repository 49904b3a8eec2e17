//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the tenant-scoped storage contract for objectives.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Objective::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.

pub mod objective_repo;
