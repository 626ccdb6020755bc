use crate::cache::{CachePhase, SeedOutcome, TodoCache};
use crate::config::EngineConfig;
use crate::db::KeyValueStore;
use crate::directory::UserDirectory;
use crate::errors::AppResult;
use crate::models::{
    FilterState, LoadState, MutationOutcome, StatusFilter, Todo, TodoView, User, UserScope,
};
use crate::mutation::{self, Mutation};
use crate::pagination::{paginate, settle_page, total_pages};
use crate::query::{filter_todos, stats};
use chrono::Utc;
use std::sync::Arc;

/// Synchronous session core. Every state transition ends with `settle`,
/// so `page` is always valid for the current filtered result.
pub struct TodoEngine {
    config: EngineConfig,
    cache: TodoCache,
    directory: UserDirectory,
    filter: FilterState,
    page: usize,
}

impl TodoEngine {
    pub fn new(config: EngineConfig, store: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        config.validate()?;
        let cache = TodoCache::open(store, &config.storage_key);
        let directory = UserDirectory::new(config.current_user.clone());
        Ok(Self {
            config,
            cache,
            directory,
            filter: FilterState::default(),
            page: 1,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn load_state(&self) -> LoadState {
        LoadState {
            todos: self.cache.load().to_vec(),
            is_loading: self.cache.is_loading(),
            is_error: self.cache.error().is_some(),
            error: self.cache.error().map(ToString::to_string),
        }
    }

    pub fn phase(&self) -> &CachePhase {
        self.cache.phase()
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn users(&self) -> &[User] {
        self.directory.list()
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn begin_seed(&mut self) -> bool {
        self.cache.begin_seed()
    }

    pub fn complete_seed(&mut self, result: AppResult<Vec<Todo>>) -> SeedOutcome {
        let limit = self.config.seed_limit;
        let outcome = self.cache.finish_seed(result.map(|mut todos| {
            todos.truncate(limit);
            todos
        }));
        self.settle(false);
        outcome
    }

    pub fn reset_error(&mut self) -> bool {
        self.cache.reset_error()
    }

    pub fn users_stale(&self) -> bool {
        self.directory.is_stale(Utc::now(), self.config.users_stale_seconds)
    }

    pub fn apply_users(&mut self, result: AppResult<Vec<User>>) {
        self.directory.apply_remote(result, Utc::now());
    }

    pub fn set_filter(&mut self, status: StatusFilter) {
        let changed = self.filter.status != status;
        self.filter.status = status;
        self.settle(changed);
    }

    pub fn set_search(&mut self, text: &str) {
        let changed = self.filter.search_text != text;
        if changed {
            self.filter.search_text = text.to_string();
        }
        self.settle(changed);
    }

    pub fn set_scoped_user(&mut self, scope: UserScope) {
        let changed = self.filter.scoped_user_id != scope;
        self.filter.scoped_user_id = scope;
        self.settle(changed);
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.settle(false);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn add_todo(&mut self, title: &str) -> MutationOutcome {
        let author_id = self.config.current_user.id;
        let id = mutation::next_id(self.cache.load(), Utc::now().timestamp_millis());
        let result = mutation::add(self.cache.load(), title, author_id, id);
        self.apply(result)
    }

    pub fn toggle_todo(&mut self, id: i64) -> MutationOutcome {
        let result = mutation::toggle(self.cache.load(), id);
        self.apply(result)
    }

    pub fn delete_todo(&mut self, id: i64) -> MutationOutcome {
        let result = mutation::delete(self.cache.load(), id);
        self.apply(result)
    }

    pub fn update_todo(&mut self, id: i64, title: &str) -> MutationOutcome {
        let author_id = self.config.current_user.id;
        let result = mutation::update(self.cache.load(), id, title, author_id);
        self.apply(result)
    }

    pub fn filtered(&self) -> Vec<Todo> {
        filter_todos(self.cache.load(), &self.filter)
    }

    pub fn view(&self) -> TodoView {
        let filtered = self.filtered();
        let total_pages = total_pages(filtered.len(), self.config.page_size);
        TodoView {
            items: paginate(&filtered, self.page, self.config.page_size),
            page: self.page,
            total_pages,
            filtered_count: filtered.len(),
            stats: stats(&filtered),
            has_previous: self.page > 1,
            has_next: self.page < total_pages,
            show_pagination: total_pages > 1,
        }
    }

    fn apply(&mut self, result: Mutation) -> MutationOutcome {
        match result.next {
            Some(next) => self.cache.commit(next),
            None => tracing::debug!(outcome = ?result.outcome, "mutation left the cache unchanged"),
        }
        self.settle(false);
        result.outcome
    }

    fn settle(&mut self, filters_changed: bool) {
        let count = filter_todos(self.cache.load(), &self.filter).len();
        let total = total_pages(count, self.config.page_size);
        self.page = settle_page(self.page, total, filters_changed);
    }
}
