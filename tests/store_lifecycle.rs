// End-to-end store behavior across the shipped providers

use tempfile::TempDir;
use todostore::{
    Config, FileProvider, Filter, IdStrategy, MemoryProvider, Provider, SqliteProvider, StoreOptions, TodoStore,
};

fn exercise<P: Provider>(store: &mut TodoStore<P>) -> Vec<(String, String, bool)> {
    store.add("write the report").unwrap();
    let groceries = store.add("  buy groceries ").unwrap().unwrap();
    store.add("call the plumber").unwrap();
    let _ = store.toggle(groceries.as_str()).unwrap();
    let _ = store.set_filter(Filter::Active);

    store
        .todos()
        .iter()
        .map(|t| (t.id().to_string(), t.text().to_string(), t.completed()))
        .collect()
}

#[test]
fn test_file_store_survives_reopen() {
    let temp = TempDir::new().unwrap();

    let expected = {
        let mut store = TodoStore::open(FileProvider::open(temp.path()).unwrap());
        exercise(&mut store)
    };

    let store = TodoStore::open(FileProvider::open(temp.path()).unwrap());
    let actual: Vec<_> = store
        .todos()
        .iter()
        .map(|t| (t.id().to_string(), t.text().to_string(), t.completed()))
        .collect();

    assert_eq!(actual, expected);
    assert_eq!(store.filter(), Filter::All);
    assert_eq!(store.stats().summary(), "2 active, 1 completed");
}

#[test]
fn test_sqlite_store_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("todostore.db");

    let expected = {
        let mut store = TodoStore::open(SqliteProvider::open(&db_path).unwrap());
        exercise(&mut store)
    };

    let store = TodoStore::open(SqliteProvider::open(&db_path).unwrap());
    let texts: Vec<&str> = store.todos().iter().map(|t| t.text()).collect();
    assert_eq!(texts, ["call the plumber", "buy groceries", "write the report"]);
    assert_eq!(store.len(), expected.len());
}

#[test]
fn test_persisted_layout_is_plain_json_array() {
    let temp = TempDir::new().unwrap();
    let mut store = TodoStore::open(FileProvider::open(temp.path()).unwrap());
    store.add("only task").unwrap();

    let raw = std::fs::read_to_string(temp.path().join("todos.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entries = value.as_array().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["text"], "only task");
    assert_eq!(entries[0]["completed"], false);
    assert!(entries[0]["id"].is_string());
    assert!(entries[0]["createdAt"].is_string());
}

#[test]
fn test_corrupt_file_starts_empty_then_recovers() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("todos.json"), "not json at all").unwrap();

    let mut store = TodoStore::open(FileProvider::open(temp.path()).unwrap());
    assert!(store.is_empty());
    assert_eq!(store.stats().summary(), "No tasks");

    store.add("fresh start").unwrap();
    let reopened = TodoStore::open(FileProvider::open(temp.path()).unwrap());
    assert_eq!(reopened.len(), 1);
}

#[test]
fn test_configured_store_uses_key_and_strategy() {
    let temp = TempDir::new().unwrap();
    let config = Config::from_yaml(&format!(
        "backend: sqlite\nstore_path: {}\nkey: work\nid_strategy: timestamp\n",
        temp.path().display()
    ))
    .unwrap();

    let mut store = TodoStore::open_with(config.open_provider().unwrap(), config.store_options());
    let id = store.add("timestamped").unwrap().unwrap();

    assert!(id.as_str().chars().all(|c| c.is_ascii_digit()));
    assert!(store.provider().get("work").unwrap().is_some());
    assert!(temp.path().join("todostore.db").exists());
}

#[test]
fn test_all_done_then_clear() {
    let options = StoreOptions {
        id_strategy: IdStrategy::Uuid,
        ..StoreOptions::default()
    };
    let mut store = TodoStore::open_with(MemoryProvider::new(), options);
    let a = store.add("a").unwrap().unwrap();
    let b = store.add("b").unwrap().unwrap();
    assert_eq!(store.stats().summary(), "2 tasks");

    let _ = store.toggle(a.as_str()).unwrap();
    let _ = store.toggle(b.as_str()).unwrap();
    assert_eq!(store.stats().summary(), "All done! 🎉");
    assert!(store.stats().can_clear_completed());

    assert_eq!(store.clear_completed().unwrap(), 2);
    assert!(store.is_empty());
    assert_eq!(store.view_with(Filter::Completed).len(), 0);
}
