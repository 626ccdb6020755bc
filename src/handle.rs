use crate::cache::SeedOutcome;
use crate::engine::TodoEngine;
use crate::models::{
    FilterState, LoadState, MutationOutcome, StatusFilter, TodoView, User, UserScope,
};
use crate::remote::SeedSource;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Shared, async-facing wrapper around a [`TodoEngine`].
///
/// The engine lock is never held across a network await, so reads issued
/// while the seed fetch is outstanding see `is_loading` and an empty list.
#[derive(Clone)]
pub struct EngineHandle {
    engine: Arc<Mutex<TodoEngine>>,
    source: Arc<dyn SeedSource>,
}

impl EngineHandle {
    pub fn new(engine: TodoEngine, source: Arc<dyn SeedSource>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            source,
        }
    }

    /// Seeds the cache (only if empty) and loads the user directory when it
    /// is stale.
    pub async fn initialize(&self) -> SeedOutcome {
        let (seed, _) = tokio::join!(self.seed_if_empty(), self.refresh_users());
        seed
    }

    pub fn spawn_initialize(&self) -> JoinHandle<SeedOutcome> {
        let handle = self.clone();
        tokio::spawn(async move { handle.initialize().await })
    }

    /// Explicit retry after a failed load. Never called automatically.
    pub async fn reload(&self) -> SeedOutcome {
        let reset = self.engine.lock().await.reset_error();
        if !reset {
            return SeedOutcome::NotRequested;
        }
        self.seed_if_empty().await
    }

    pub async fn refresh_users(&self) -> bool {
        if !self.engine.lock().await.users_stale() {
            return false;
        }
        self.load_users().await;
        true
    }

    async fn seed_if_empty(&self) -> SeedOutcome {
        let should_fetch = self.engine.lock().await.begin_seed();
        if !should_fetch {
            return SeedOutcome::NotRequested;
        }

        let result = self.source.fetch_todos().await;
        self.engine.lock().await.complete_seed(result)
    }

    async fn load_users(&self) {
        let result = self.source.fetch_users().await;
        self.engine.lock().await.apply_users(result);
    }

    pub async fn load_state(&self) -> LoadState {
        self.engine.lock().await.load_state()
    }

    pub async fn view(&self) -> TodoView {
        self.engine.lock().await.view()
    }

    pub async fn users(&self) -> Vec<User> {
        self.engine.lock().await.users().to_vec()
    }

    pub async fn filter_state(&self) -> FilterState {
        self.engine.lock().await.filter_state().clone()
    }

    pub async fn set_filter(&self, status: StatusFilter) {
        self.engine.lock().await.set_filter(status);
    }

    pub async fn set_search(&self, text: &str) {
        self.engine.lock().await.set_search(text);
    }

    pub async fn set_scoped_user(&self, scope: UserScope) {
        self.engine.lock().await.set_scoped_user(scope);
    }

    pub async fn set_page(&self, page: usize) {
        self.engine.lock().await.set_page(page);
    }

    pub async fn next_page(&self) {
        self.engine.lock().await.next_page();
    }

    pub async fn previous_page(&self) {
        self.engine.lock().await.previous_page();
    }

    pub async fn add_todo(&self, title: &str) -> MutationOutcome {
        self.engine.lock().await.add_todo(title)
    }

    pub async fn toggle_todo(&self, id: i64) -> MutationOutcome {
        self.engine.lock().await.toggle_todo(id)
    }

    pub async fn delete_todo(&self, id: i64) -> MutationOutcome {
        self.engine.lock().await.delete_todo(id)
    }

    pub async fn update_todo(&self, id: i64, title: &str) -> MutationOutcome {
        self.engine.lock().await.update_todo(id, title)
    }
}
