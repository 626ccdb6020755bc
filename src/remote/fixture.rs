use super::SeedSource;
use crate::errors::{AppError, AppResult};
use crate::models::{Todo, User};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Canned source with fetch counters. Responses can be swapped at any
/// time to model the remote data changing under a running session.
#[derive(Debug)]
pub struct FixtureSource {
    todos: Mutex<Result<Vec<Todo>, String>>,
    users: Mutex<Result<Vec<User>, String>>,
    todo_fetches: AtomicUsize,
    user_fetches: AtomicUsize,
}

impl FixtureSource {
    pub fn new(todos: Vec<Todo>, users: Vec<User>) -> Self {
        Self {
            todos: Mutex::new(Ok(todos)),
            users: Mutex::new(Ok(users)),
            todo_fetches: AtomicUsize::new(0),
            user_fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            todos: Mutex::new(Err(message.to_string())),
            users: Mutex::new(Err(message.to_string())),
            todo_fetches: AtomicUsize::new(0),
            user_fetches: AtomicUsize::new(0),
        }
    }

    pub fn set_todos(&self, todos: Result<Vec<Todo>, String>) {
        if let Ok(mut slot) = self.todos.lock() {
            *slot = todos;
        }
    }

    pub fn set_users(&self, users: Result<Vec<User>, String>) {
        if let Ok(mut slot) = self.users.lock() {
            *slot = users;
        }
    }

    pub fn todo_fetches(&self) -> usize {
        self.todo_fetches.load(Ordering::SeqCst)
    }

    pub fn user_fetches(&self) -> usize {
        self.user_fetches.load(Ordering::SeqCst)
    }
}

fn respond<T: Clone>(slot: &Mutex<Result<Vec<T>, String>>) -> AppResult<Vec<T>> {
    let guard = slot
        .lock()
        .map_err(|_| AppError::Internal("fixture mutex poisoned".to_string()))?;
    guard.clone().map_err(AppError::Remote)
}

#[async_trait]
impl SeedSource for FixtureSource {
    async fn fetch_todos(&self) -> AppResult<Vec<Todo>> {
        self.todo_fetches.fetch_add(1, Ordering::SeqCst);
        respond(&self.todos)
    }

    async fn fetch_users(&self) -> AppResult<Vec<User>> {
        self.user_fetches.fetch_add(1, Ordering::SeqCst);
        respond(&self.users)
    }
}
