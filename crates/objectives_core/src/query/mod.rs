//! Due-today selection over a tenant's objectives.
//!
//! # Responsibility
//! - Own the single due-date predicate and its in-memory/SQL evaluators.
//! - Filter a tenant's objective set to those due on a given day.

pub mod due;
pub mod selector;
