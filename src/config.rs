use crate::errors::{AppError, AppResult};
use crate::models::User;
use anyhow::Context;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_STORAGE_KEY: &str = "todos";
const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_SEED_LIMIT: usize = 200;
const DEFAULT_REMOTE_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
const DEFAULT_USERS_STALE_SECONDS: u64 = 300;

/// Everything the engine would otherwise read from module-level constants.
/// Each session owns its own copy, so tests can run side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub storage_key: String,
    pub page_size: usize,
    pub seed_limit: usize,
    pub remote_base_url: String,
    pub current_user: User,
    pub users_stale_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            seed_limit: DEFAULT_SEED_LIMIT,
            remote_base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            current_user: User {
                id: 999,
                name: "Anh Khoa".to_string(),
                email: Some("anhkhoa@local.app".to_string()),
            },
            users_stale_seconds: DEFAULT_USERS_STALE_SECONDS,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(raw: &str) -> AppResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML config file. A missing file means defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))
            .map_err(|err| AppError::Config(format!("{:#}", err)))?;
        Self::from_yaml_str(&raw)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.page_size == 0 {
            return Err(AppError::Config("pageSize must be at least 1".to_string()));
        }
        if self.storage_key.trim().is_empty() {
            return Err(AppError::Config("storageKey cannot be empty".to_string()));
        }
        if self.current_user.name.trim().is_empty() {
            return Err(AppError::Config("currentUser.name cannot be empty".to_string()));
        }
        if self.users_stale_window().is_none() {
            return Err(AppError::Config(format!(
                "usersStaleSeconds {} is out of range",
                self.users_stale_seconds
            )));
        }
        Ok(())
    }

    /// `None` when the configured seconds do not fit a `chrono::Duration`.
    pub fn users_stale_window(&self) -> Option<Duration> {
        i64::try_from(self.users_stale_seconds)
            .ok()
            .and_then(Duration::try_seconds)
    }
}
