use chrono::NaiveDate;
use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    Priority, SnapshotRepository, SqliteSnapshotRepository, StoreError, TaskId, TaskStore,
};
use uuid::Uuid;

fn store() -> TaskStore<SqliteSnapshotRepository> {
    let repo = SqliteSnapshotRepository::try_new(open_db_in_memory().unwrap()).unwrap();
    TaskStore::open(repo).unwrap()
}

fn order(store: &TaskStore<SqliteSnapshotRepository>) -> Vec<String> {
    store.tasks().iter().map(|t| t.text.clone()).collect()
}

#[test]
fn add_appends_a_pending_task_and_returns_its_id() {
    let mut store = store();

    let id = store
        .add("  buy milk  ", Priority::High, None)
        .unwrap()
        .expect("non-empty text should be accepted");

    assert_eq!(store.len(), 1);
    let task = store.get(id).unwrap();
    assert_eq!(task.text, "buy milk");
    assert!(!task.completed);
    assert_eq!(task.priority, Priority::High);
}

#[test]
fn add_rejects_whitespace_only_text() {
    let mut store = store();

    let id = store.add("   ", Priority::Low, None).unwrap();

    assert_eq!(id, None);
    assert!(store.is_empty());
}

#[test]
fn double_toggle_restores_completion_state() {
    let mut store = store();
    let id = store.add("task", Priority::Low, None).unwrap().unwrap();

    assert!(store.toggle_complete(id).unwrap());
    assert!(!store.toggle_complete(id).unwrap());
    assert!(!store.get(id).unwrap().completed);
}

#[test]
fn edit_trims_and_allows_empty_text() {
    let mut store = store();
    let id = store.add("draft", Priority::Low, None).unwrap().unwrap();

    store.edit_text(id, "  edited  ").unwrap();
    assert_eq!(store.get(id).unwrap().text, "edited");

    store.edit_text(id, "   ").unwrap();
    assert_eq!(store.get(id).unwrap().text, "");
}

#[test]
fn remove_deletes_exactly_the_given_task() {
    let mut store = store();
    let keep = store.add("keep", Priority::Low, None).unwrap().unwrap();
    let drop = store.add("drop", Priority::Low, None).unwrap().unwrap();

    let removed = store.remove(drop).unwrap();
    assert_eq!(removed.id, drop);
    assert_eq!(store.len(), 1);
    assert!(store.get(keep).is_some());
}

#[test]
fn operations_on_unknown_ids_return_not_found() {
    let mut store = store();
    store.add("task", Priority::Low, None).unwrap().unwrap();
    let unknown: TaskId = Uuid::new_v4();

    assert!(matches!(
        store.toggle_complete(unknown),
        Err(StoreError::NotFound(id)) if id == unknown
    ));
    assert!(matches!(
        store.edit_text(unknown, "text"),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(store.remove(unknown), Err(StoreError::NotFound(_))));
}

#[test]
fn reorder_replaces_the_full_order() {
    let mut store = store();
    let a = store.add("a", Priority::Low, None).unwrap().unwrap();
    let b = store.add("b", Priority::Low, None).unwrap().unwrap();
    let c = store.add("c", Priority::Low, None).unwrap().unwrap();

    store.reorder(&[c, a, b]).unwrap();

    assert_eq!(order(&store), vec!["c", "a", "b"]);
}

#[test]
fn reorder_with_wrong_membership_fails_and_keeps_order() {
    let mut store = store();
    let a = store.add("a", Priority::Low, None).unwrap().unwrap();
    let b = store.add("b", Priority::Low, None).unwrap().unwrap();

    let short = store.reorder(&[b]);
    assert!(matches!(short, Err(StoreError::OrderMismatch)));

    let duplicated = store.reorder(&[a, a]);
    assert!(matches!(duplicated, Err(StoreError::OrderMismatch)));

    let foreign = store.reorder(&[a, Uuid::new_v4()]);
    assert!(matches!(foreign, Err(StoreError::OrderMismatch)));

    assert_eq!(order(&store), vec!["a", "b"]);
}

#[test]
fn reorder_visible_permutes_only_the_subset_slots() {
    let mut store = store();
    let a = store.add("a", Priority::Low, None).unwrap().unwrap();
    let _b = store.add("b", Priority::Low, None).unwrap().unwrap();
    let c = store.add("c", Priority::Low, None).unwrap().unwrap();
    let _d = store.add("d", Priority::Low, None).unwrap().unwrap();

    // Visible subset {a, c} swapped; hidden b and d keep their positions.
    store.reorder_visible(&[c, a]).unwrap();

    assert_eq!(order(&store), vec!["c", "b", "a", "d"]);
}

#[test]
fn reorder_visible_rejects_ids_outside_the_list() {
    let mut store = store();
    let a = store.add("a", Priority::Low, None).unwrap().unwrap();

    let result = store.reorder_visible(&[a, Uuid::new_v4()]);
    assert!(matches!(result, Err(StoreError::OrderMismatch)));
    assert_eq!(order(&store), vec!["a"]);
}

#[test]
fn every_mutation_writes_the_snapshot_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskdeck.db");

    let repo = SqliteSnapshotRepository::try_new(taskdeck_core::db::open_db(&path).unwrap())
        .unwrap();
    let mut store = TaskStore::open(repo).unwrap();
    // Second connection to the same file observes what the store wrote.
    let observer =
        SqliteSnapshotRepository::try_new(taskdeck_core::db::open_db(&path).unwrap()).unwrap();

    let a = store.add("a", Priority::High, None).unwrap().unwrap();
    assert_eq!(observer.load_tasks().unwrap(), store.tasks());

    let b = store
        .add(
            "b",
            Priority::Low,
            Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        )
        .unwrap()
        .unwrap();
    assert_eq!(observer.load_tasks().unwrap(), store.tasks());

    store.toggle_complete(a).unwrap();
    assert_eq!(observer.load_tasks().unwrap(), store.tasks());

    store.edit_text(b, "b edited").unwrap();
    assert_eq!(observer.load_tasks().unwrap(), store.tasks());

    store.reorder(&[b, a]).unwrap();
    assert_eq!(observer.load_tasks().unwrap(), store.tasks());

    store.remove(a).unwrap();
    assert_eq!(observer.load_tasks().unwrap(), store.tasks());
}

#[test]
fn store_restores_tasks_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskdeck.db");

    {
        let conn = taskdeck_core::db::open_db(&path).unwrap();
        let repo = SqliteSnapshotRepository::try_new(conn).unwrap();
        let mut store = TaskStore::open(repo).unwrap();
        store.add("persisted", Priority::Medium, None).unwrap();
    }

    let conn = taskdeck_core::db::open_db(&path).unwrap();
    let repo = SqliteSnapshotRepository::try_new(conn).unwrap();
    let store = TaskStore::open(repo).unwrap();

    assert_eq!(order(&store), vec!["persisted"]);
    assert_eq!(store.tasks()[0].priority, Priority::Medium);
}
