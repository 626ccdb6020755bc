use crate::db::{read_json, write_json, KeyValueStore};
use crate::errors::AppResult;
use crate::models::Todo;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachePhase {
    /// Nothing persisted and no fetch issued yet.
    Empty,
    /// Seed fetch outstanding; reads see the empty collection.
    Loading,
    /// Populated, either from the store or from the one seed fetch.
    Seeded,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Committed(usize),
    Discarded,
    Failed,
    NotRequested,
}

/// Authoritative local todo collection, written through to a key-value store.
pub struct TodoCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
    todos: Vec<Todo>,
    phase: CachePhase,
}

impl TodoCache {
    pub fn open(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        let persisted: Vec<Todo> = read_json(store.as_ref(), key).unwrap_or_default();
        let todos = dedupe_ids(persisted, key);
        let phase = if todos.is_empty() {
            CachePhase::Empty
        } else {
            CachePhase::Seeded
        };
        tracing::debug!(key, count = todos.len(), ?phase, "todo cache opened");

        Self {
            store,
            key: key.to_string(),
            todos,
            phase,
        }
    }

    pub fn load(&self) -> &[Todo] {
        &self.todos
    }

    pub fn phase(&self) -> &CachePhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == CachePhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            CachePhase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Moves `Empty -> Loading`. Returns whether the caller should issue the
    /// remote fetch; every other phase means the remote is not consulted.
    pub fn begin_seed(&mut self) -> bool {
        if self.phase != CachePhase::Empty || !self.todos.is_empty() {
            return false;
        }
        self.phase = CachePhase::Loading;
        tracing::info!(key = %self.key, "seeding todo cache from remote");
        true
    }

    pub fn finish_seed(&mut self, result: AppResult<Vec<Todo>>) -> SeedOutcome {
        if self.phase != CachePhase::Loading {
            return SeedOutcome::NotRequested;
        }

        match result {
            Ok(_) if !self.todos.is_empty() => {
                self.phase = CachePhase::Seeded;
                tracing::info!(
                    key = %self.key,
                    "cache populated locally during seed, discarding remote result"
                );
                SeedOutcome::Discarded
            }
            Ok(fetched) => {
                let fetched = dedupe_ids(fetched, &self.key);
                let count = fetched.len();
                self.commit(fetched);
                self.phase = CachePhase::Seeded;
                tracing::info!(key = %self.key, count, "todo cache seeded");
                SeedOutcome::Committed(count)
            }
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "seed fetch failed");
                self.phase = CachePhase::Error(error.to_string());
                SeedOutcome::Failed
            }
        }
    }

    /// Returns an errored cache to `Empty` so an explicit reload can seed again.
    pub fn reset_error(&mut self) -> bool {
        if matches!(self.phase, CachePhase::Error(_)) {
            self.phase = CachePhase::Empty;
            return true;
        }
        false
    }

    /// Replaces the whole collection. The in-memory copy is authoritative for
    /// the session even when the store write fails.
    pub fn commit(&mut self, next: Vec<Todo>) {
        if let Err(error) = write_json(self.store.as_ref(), &self.key, &next) {
            tracing::warn!(key = %self.key, %error, "failed to persist todo collection");
        }
        self.todos = next;
        if !self.todos.is_empty() && self.phase == CachePhase::Empty {
            self.phase = CachePhase::Seeded;
        }
    }
}

fn dedupe_ids(todos: Vec<Todo>, key: &str) -> Vec<Todo> {
    let mut seen = HashSet::with_capacity(todos.len());
    let before = todos.len();
    let unique = todos
        .into_iter()
        .filter(|todo| seen.insert(todo.id))
        .collect::<Vec<_>>();
    if unique.len() != before {
        tracing::warn!(key, dropped = before - unique.len(), "dropped todos with duplicate ids");
    }
    unique
}
