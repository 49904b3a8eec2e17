//! Tenant scope key.
//!
//! # Invariants
//! - A `TenantKey` is never empty and never carries surrounding whitespace.
//! - Every storage and service operation takes a `&TenantKey`; there is no
//!   implicit default scope.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const TENANT_KEY_MAX_CHARS: usize = 128;

/// Opaque identifier partitioning objectives by owner.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantKey(String);

impl TenantKey {
    /// Builds a tenant key from identity-provider output.
    ///
    /// Leading/trailing whitespace is trimmed before validation.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidTenantKey("must not be empty"));
        }
        if trimmed.chars().count() > TENANT_KEY_MAX_CHARS {
            return Err(ValidationError::InvalidTenantKey(
                "must be at most 128 characters",
            ));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(ValidationError::InvalidTenantKey(
                "must not contain control characters",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TenantKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TenantKey> for String {
    fn from(value: TenantKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for TenantKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TenantKey {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
