use async_trait::async_trait;
use local_todo_app_lib::{
    db::read_json, AppResult, CachePhase, EngineConfig, EngineHandle, FixtureSource,
    KeyValueStore, MemoryStore, SeedOutcome, SeedSource, StatusFilter, Todo, TodoEngine, User,
    UserScope,
};
use std::sync::Arc;
use tokio::sync::Notify;

fn todo(id: i64, title: &str, completed: bool, user_id: i64) -> Todo {
    Todo {
        id,
        title: title.to_string(),
        completed,
        user_id,
    }
}

fn numbered(count: i64) -> Vec<Todo> {
    (1..=count)
        .map(|id| todo(id, &format!("Item {}", id), false, 1))
        .collect()
}

fn handle_with(store: Arc<MemoryStore>, source: Arc<dyn SeedSource>) -> EngineHandle {
    let engine = TodoEngine::new(EngineConfig::default(), store).expect("engine");
    EngineHandle::new(engine, source)
}

/// Holds the todo fetch open until released.
struct GatedSource {
    gate: Notify,
    todos: Vec<Todo>,
}

#[async_trait]
impl SeedSource for GatedSource {
    async fn fetch_todos(&self) -> AppResult<Vec<Todo>> {
        self.gate.notified().await;
        Ok(self.todos.clone())
    }

    async fn fetch_users(&self) -> AppResult<Vec<User>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn empty_cache_seeds_from_remote_and_persists() {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(FixtureSource::new(vec![todo(1, "A", false, 1)], Vec::new()));
    let handle = handle_with(store.clone(), source.clone());

    assert_eq!(handle.initialize().await, SeedOutcome::Committed(1));

    let state = handle.load_state().await;
    assert_eq!(state.todos, vec![todo(1, "A", false, 1)]);
    assert!(!state.is_loading && !state.is_error);

    let persisted: Vec<Todo> = read_json(&*store, "todos").expect("persisted collection");
    assert_eq!(persisted, vec![todo(1, "A", false, 1)]);
}

#[tokio::test]
async fn seeded_cache_never_fetches_again() {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(FixtureSource::new(vec![todo(1, "A", false, 1)], Vec::new()));

    let first = handle_with(store.clone(), source.clone());
    first.initialize().await;
    assert_eq!(source.todo_fetches(), 1);

    source.set_todos(Ok(vec![todo(7, "changed upstream", true, 3)]));
    assert_eq!(first.initialize().await, SeedOutcome::NotRequested);

    let second = handle_with(store, source.clone());
    assert_eq!(second.initialize().await, SeedOutcome::NotRequested);
    assert_eq!(second.load_state().await.todos[0].title, "A");
    assert_eq!(source.todo_fetches(), 1);
}

#[tokio::test]
async fn reads_during_seed_fetch_see_loading_and_empty() {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(GatedSource {
        gate: Notify::new(),
        todos: numbered(3),
    });
    let handle = handle_with(store, source.clone());

    let task = handle.spawn_initialize();
    loop {
        if handle.load_state().await.is_loading {
            break;
        }
        tokio::task::yield_now().await;
    }
    let during = handle.load_state().await;
    assert!(during.todos.is_empty());
    assert!(!during.is_error);

    source.gate.notify_one();
    assert_eq!(task.await.expect("join"), SeedOutcome::Committed(3));
    assert_eq!(handle.load_state().await.todos.len(), 3);
}

#[tokio::test]
async fn local_add_during_seed_wins_over_remote() {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(GatedSource {
        gate: Notify::new(),
        todos: numbered(3),
    });
    let handle = handle_with(store, source.clone());

    let task = handle.spawn_initialize();
    while !handle.load_state().await.is_loading {
        tokio::task::yield_now().await;
    }
    handle.add_todo("typed before the seed landed").await;
    source.gate.notify_one();

    assert_eq!(task.await.expect("join"), SeedOutcome::Discarded);
    let state = handle.load_state().await;
    assert_eq!(state.todos.len(), 1);
    assert_eq!(state.todos[0].title, "typed before the seed landed");
}

#[tokio::test]
async fn failed_seed_is_fatal_but_users_degrade() {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(FixtureSource::failing("HTTP 503 Service Unavailable"));
    let handle = handle_with(store, source.clone());

    assert_eq!(handle.initialize().await, SeedOutcome::Failed);
    let state = handle.load_state().await;
    assert!(state.is_error);
    assert!(state.error.expect("message").contains("503"));

    let users = handle.users().await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, 999);

    // no automatic retry
    handle.initialize().await;
    assert_eq!(source.todo_fetches(), 1);
}

#[tokio::test]
async fn directory_contains_current_user_once() {
    let store = Arc::new(MemoryStore::new());
    let remote_users = vec![
        User {
            id: 1,
            name: "Leanne Graham".to_string(),
            email: Some("Sincere@april.biz".to_string()),
        },
        User {
            id: 11,
            name: "Anh Khoa".to_string(),
            email: None,
        },
    ];
    let source = Arc::new(FixtureSource::new(Vec::new(), remote_users));
    let handle = handle_with(store, source);

    handle.initialize().await;
    let users = handle.users().await;
    let names = users.iter().map(|u| u.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Anh Khoa", "Leanne Graham"]);
    assert_eq!(users[0].id, 999);
}

#[tokio::test]
async fn deleting_shrinks_pages_and_settles() {
    let store = Arc::new(MemoryStore::new());
    local_todo_app_lib::db::write_json(&*store, "todos", &numbered(25)).expect("seed store");
    let source = Arc::new(FixtureSource::new(Vec::new(), Vec::new()));
    let handle = handle_with(store, source);

    handle.set_page(3).await;
    let view = handle.view().await;
    assert_eq!((view.page, view.total_pages, view.items.len()), (3, 3, 5));

    for id in 1..=16 {
        handle.delete_todo(id).await;
    }
    let view = handle.view().await;
    assert_eq!(view.filtered_count, 9);
    assert_eq!(view.page, 1);
    assert_eq!(view.items.first().map(|t| t.id), Some(17));
}

#[tokio::test]
async fn filter_search_and_scope_compose_with_paging() {
    let store = Arc::new(MemoryStore::new());
    let mut collection = numbered(12);
    collection.push(todo(100, "Write REPORT", true, 2));
    collection.push(todo(101, "report draft", false, 2));
    local_todo_app_lib::db::write_json(&*store, "todos", &collection).expect("seed store");
    let handle = handle_with(store, Arc::new(FixtureSource::new(Vec::new(), Vec::new())));

    handle.set_page(2).await;
    handle.set_search("Report").await;
    let view = handle.view().await;
    assert_eq!(view.page, 1);
    assert_eq!(view.items.iter().map(|t| t.id).collect::<Vec<_>>(), vec![100, 101]);

    handle.set_filter(StatusFilter::Completed).await;
    assert_eq!(handle.view().await.items.len(), 1);

    handle.set_filter(StatusFilter::All).await;
    handle.set_search("").await;
    handle.set_scoped_user(UserScope::User(1)).await;
    let view = handle.view().await;
    assert_eq!(view.filtered_count, 12);
    assert_eq!(view.total_pages, 2);
    assert!(view.show_pagination && view.has_next && !view.has_previous);

    let filters = handle.filter_state().await;
    assert_eq!(filters.scoped_user_id, UserScope::User(1));
}

#[tokio::test]
async fn mutations_write_through_to_store() {
    let store = Arc::new(MemoryStore::new());
    local_todo_app_lib::db::write_json(&*store, "todos", &numbered(2)).expect("seed store");
    let handle = handle_with(store.clone(), Arc::new(FixtureSource::new(Vec::new(), Vec::new())));

    handle.toggle_todo(1).await;
    handle.update_todo(2, "Renamed").await;
    handle.add_todo("Buy milk").await;
    handle.add_todo("   ").await;

    let persisted: Vec<Todo> = read_json(&*store, "todos").expect("persisted");
    assert_eq!(persisted.len(), 3);
    assert_eq!(persisted[0].title, "Buy milk");
    assert!(persisted.iter().any(|t| t.id == 1 && t.completed));
    assert!(persisted.iter().any(|t| t.id == 2 && t.title == "Renamed" && t.user_id == 999));
}

#[test]
fn corrupt_store_opens_empty_and_ready_to_seed() {
    let store = Arc::new(MemoryStore::with_value("todos", "not json at all"));
    let mut engine = TodoEngine::new(EngineConfig::default(), store.clone()).expect("engine");
    assert_eq!(engine.phase(), &CachePhase::Empty);
    assert!(engine.begin_seed());
    assert!(store.get("todos").expect("raw value").is_some());
}
