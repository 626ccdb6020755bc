use crate::models::{FilterState, Todo, TodoStats};

/// Stable filter: every predicate in `state` must hold, input order is kept.
pub fn filter_todos(todos: &[Todo], state: &FilterState) -> Vec<Todo> {
    let needle = state.search_text.to_lowercase();
    todos
        .iter()
        .filter(|todo| matches(todo, state, &needle))
        .cloned()
        .collect()
}

fn matches(todo: &Todo, state: &FilterState, needle: &str) -> bool {
    if !state.status.admits(todo.completed) {
        return false;
    }
    if !needle.is_empty() && !todo.title.to_lowercase().contains(needle) {
        return false;
    }
    state.scoped_user_id.admits(todo.user_id)
}

pub fn stats(todos: &[Todo]) -> TodoStats {
    let completed = todos.iter().filter(|todo| todo.completed).count();
    TodoStats {
        total: todos.len(),
        active: todos.len() - completed,
        completed,
    }
}
