//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into tracker use cases.
//! - Keep CLI callers decoupled from storage details.

pub mod objective_service;
