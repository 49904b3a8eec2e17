//! Runtime configuration resolved from CLI flags and environment.

use anyhow::{anyhow, Context};
use objectives_core::{default_log_level, init_logging, TenantKey};
use std::path::PathBuf;

/// Effective settings for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub tenant: TenantKey,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Validates raw inputs; the tenant key is mandatory.
    pub fn resolve(
        db_path: PathBuf,
        tenant: Option<&str>,
        log_level: Option<&str>,
        log_dir: Option<&str>,
    ) -> anyhow::Result<Self> {
        let tenant = tenant
            .ok_or_else(|| anyhow!("a tenant key is required (--tenant or OBJECTIVES_TENANT)"))?;
        let tenant = TenantKey::new(tenant).context("invalid --tenant value")?;

        Ok(Self {
            db_path,
            tenant,
            log_level: log_level.unwrap_or(default_log_level()).to_string(),
            log_dir: log_dir
                .map(str::trim)
                .filter(|dir| !dir.is_empty())
                .map(str::to_string),
        })
    }

    /// Starts file logging when a log directory is configured.
    pub fn init_logging(&self) -> anyhow::Result<()> {
        if let Some(log_dir) = self.log_dir.as_deref() {
            init_logging(&self.log_level, log_dir).context("failed to initialize logging")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use std::path::PathBuf;

    #[test]
    fn resolve_requires_tenant() {
        let err = Config::resolve(PathBuf::from("db.sqlite3"), None, None, None).unwrap_err();
        assert!(err.to_string().contains("tenant key is required"));
    }

    #[test]
    fn resolve_applies_defaults_and_drops_blank_log_dir() {
        let config =
            Config::resolve(PathBuf::from("db.sqlite3"), Some(" user-a "), None, Some("  "))
                .unwrap();
        assert_eq!(config.tenant.as_str(), "user-a");
        assert_eq!(config.log_level, objectives_core::default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn resolve_rejects_blank_tenant() {
        assert!(Config::resolve(PathBuf::from("db.sqlite3"), Some(" "), None, None).is_err());
    }
}
