pub mod cache;
pub mod config;
pub mod db;
pub mod directory;
pub mod engine;
pub mod errors;
pub mod handle;
pub mod models;
pub mod mutation;
pub mod pagination;
pub mod query;
pub mod remote;

pub use crate::cache::{CachePhase, SeedOutcome, TodoCache};
pub use crate::config::EngineConfig;
pub use crate::db::{Database, KeyValueStore, MemoryStore};
pub use crate::engine::TodoEngine;
pub use crate::errors::{AppError, AppResult};
pub use crate::handle::EngineHandle;
pub use crate::models::{
    FilterState, LoadState, MutationOutcome, StatusFilter, Todo, TodoStats, TodoView, User,
    UserScope,
};
pub use crate::remote::{FixtureSource, HttpSeedSource, SeedSource};

use std::path::Path;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;

const DATABASE_FILE: &str = "todo_cache.db";

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// Wires the on-disk cache under `data_dir` to the configured HTTP source.
pub fn open_engine(data_dir: &Path, config: EngineConfig) -> AppResult<EngineHandle> {
    let database = Database::new(&data_dir.join(DATABASE_FILE))?;
    tracing::info!(path = %database.path().display(), "opened todo cache database");
    let source = HttpSeedSource::new(config.remote_base_url.clone());
    let engine = TodoEngine::new(config, Arc::new(database))?;
    Ok(EngineHandle::new(engine, Arc::new(source)))
}

pub fn init_tracing(data_dir: &Path) -> Result<(), String> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "todo-engine.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}
