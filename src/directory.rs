use crate::errors::AppResult;
use crate::models::User;
use chrono::{DateTime, Duration, Utc};

/// Remote users plus the locally synthesized current user, always first
/// and always exactly once.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    current_user: User,
    users: Vec<User>,
    fetched_at: Option<DateTime<Utc>>,
}

impl UserDirectory {
    pub fn new(current_user: User) -> Self {
        let users = vec![current_user.clone()];
        Self {
            current_user,
            users,
            fetched_at: None,
        }
    }

    pub fn list(&self) -> &[User] {
        &self.users
    }

    pub fn current_user(&self) -> &User {
        &self.current_user
    }

    pub fn find(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// A window too large for `Duration` never expires.
    pub fn is_stale(&self, now: DateTime<Utc>, stale_after_seconds: u64) -> bool {
        let Some(at) = self.fetched_at else {
            return true;
        };
        match i64::try_from(stale_after_seconds)
            .ok()
            .and_then(Duration::try_seconds)
        {
            Some(window) => now - at >= window,
            None => false,
        }
    }

    /// A failed fetch keeps whatever was there before, which on first load
    /// is just the current user.
    pub fn apply_remote(&mut self, result: AppResult<Vec<User>>, now: DateTime<Utc>) {
        match result {
            Ok(remote) => {
                self.users = merge_current_user(&self.current_user, remote);
                self.fetched_at = Some(now);
                tracing::debug!(count = self.users.len(), "user directory refreshed");
            }
            Err(error) => {
                tracing::warn!(%error, "user fetch failed, keeping previous directory");
            }
        }
    }
}

pub fn merge_current_user(current_user: &User, remote: Vec<User>) -> Vec<User> {
    let mut users = Vec::with_capacity(remote.len() + 1);
    users.push(current_user.clone());
    users.extend(remote.into_iter().filter(|user| user.name != current_user.name));
    users
}
