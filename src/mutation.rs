//! Pure collection rewrites behind the four CRUD operations. Each returns
//! the next collection to commit, or `None` when nothing changes.

use crate::models::{MutationOutcome, Todo};
use std::collections::HashSet;

pub struct Mutation {
    pub next: Option<Vec<Todo>>,
    pub outcome: MutationOutcome,
}

impl Mutation {
    fn unchanged(outcome: MutationOutcome) -> Self {
        Self { next: None, outcome }
    }
}

/// Time-based like a wall-clock id, but never collides with an id already
/// in the collection. Once the largest id is `i64::MAX` the smallest free
/// id from 1 upwards is used instead.
pub fn next_id(todos: &[Todo], now_millis: i64) -> i64 {
    let Some(max) = todos.iter().map(|todo| todo.id).max() else {
        return now_millis;
    };
    match max.checked_add(1) {
        Some(floor) => now_millis.max(floor),
        None => {
            let taken = todos.iter().map(|todo| todo.id).collect::<HashSet<_>>();
            (1..=i64::MAX)
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or(i64::MIN)
        }
    }
}

pub fn add(todos: &[Todo], title: &str, author_id: i64, id: i64) -> Mutation {
    if title.trim().is_empty() {
        return Mutation::unchanged(MutationOutcome::Rejected);
    }
    let mut next = Vec::with_capacity(todos.len() + 1);
    next.push(Todo {
        id,
        title: title.to_string(),
        completed: false,
        user_id: author_id,
    });
    next.extend_from_slice(todos);
    Mutation {
        next: Some(next),
        outcome: MutationOutcome::Added { id },
    }
}

pub fn toggle(todos: &[Todo], id: i64) -> Mutation {
    let Some(current) = todos.iter().find(|todo| todo.id == id) else {
        return Mutation::unchanged(MutationOutcome::NotFound { id });
    };
    let completed = !current.completed;
    let next = todos
        .iter()
        .map(|todo| {
            if todo.id == id {
                Todo {
                    completed,
                    ..todo.clone()
                }
            } else {
                todo.clone()
            }
        })
        .collect();
    Mutation {
        next: Some(next),
        outcome: MutationOutcome::Toggled { id, completed },
    }
}

pub fn delete(todos: &[Todo], id: i64) -> Mutation {
    if !todos.iter().any(|todo| todo.id == id) {
        return Mutation::unchanged(MutationOutcome::NotFound { id });
    }
    let next = todos.iter().filter(|todo| todo.id != id).cloned().collect();
    Mutation {
        next: Some(next),
        outcome: MutationOutcome::Deleted { id },
    }
}

pub fn update(todos: &[Todo], id: i64, new_title: &str, author_id: i64) -> Mutation {
    if new_title.trim().is_empty() {
        return Mutation::unchanged(MutationOutcome::Rejected);
    }
    if !todos.iter().any(|todo| todo.id == id) {
        return Mutation::unchanged(MutationOutcome::NotFound { id });
    }
    let next = todos
        .iter()
        .map(|todo| {
            if todo.id == id {
                Todo {
                    title: new_title.to_string(),
                    user_id: author_id,
                    ..todo.clone()
                }
            } else {
                todo.clone()
            }
        })
        .collect();
    Mutation {
        next: Some(next),
        outcome: MutationOutcome::Updated { id },
    }
}
