use taskboard::store::{StoreError, TaskPatch, TaskStore};
use uuid::Uuid;

fn store_with_tasks(board_id: &str, titles: &[&str]) -> (TaskStore, Vec<Uuid>) {
    let mut store = TaskStore::new();
    let ids = titles
        .iter()
        .map(|t| store.add_task(t, board_id).expect("seed task"))
        .collect();
    (store, ids)
}

fn titles(store: &TaskStore, board_id: &str) -> Vec<String> {
    store
        .board(board_id)
        .expect("board")
        .tasks
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

#[test]
fn test_new_store_has_five_fixed_boards() {
    let store = TaskStore::new();
    let ids: Vec<&str> = store.boards().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["backlog", "todo", "in progress", "test", "done"]);
    assert!(store.boards().iter().all(|b| b.tasks.is_empty()));
    assert_eq!(store.revision(), 0);
}

#[test]
fn test_add_task_to_empty_backlog() {
    let mut store = TaskStore::new();
    let id = store.add_task("Buy milk", "backlog").expect("add");

    let backlog = store.board("backlog").expect("board");
    assert_eq!(backlog.tasks.len(), 1);
    let task = &backlog.tasks[0];
    assert_eq!(task.id, id);
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.status, "backlog");
    assert!(task.deleted_at.is_none());
    assert!(!task.id.is_nil());
}

#[test]
fn test_add_task_to_unknown_board_fails() {
    let mut store = TaskStore::new();
    let err = store.add_task("Lost", "nowhere").unwrap_err();
    assert_eq!(err, StoreError::BoardNotFound("nowhere".to_string()));
    assert_eq!(store.revision(), 0);
    assert!(store.boards().iter().all(|b| b.tasks.is_empty()));
}

#[test]
fn test_update_task_overwrites_only_provided_fields() {
    let (mut store, ids) = store_with_tasks("todo", &["Old title"]);

    store
        .update_task(
            ids[0],
            "todo",
            TaskPatch {
                title: Some("New title".to_string()),
                status: None,
            },
        )
        .expect("update");

    let task = &store.board("todo").unwrap().tasks[0];
    assert_eq!(task.title, "New title");
    assert_eq!(task.status, "todo");
}

#[test]
fn test_update_status_moves_task_and_keeps_it_in_sync() {
    let (mut store, ids) = store_with_tasks("todo", &["Migrating"]);

    store
        .update_task(
            ids[0],
            "todo",
            TaskPatch {
                title: None,
                status: Some("done".to_string()),
            },
        )
        .expect("update");

    assert!(store.board("todo").unwrap().tasks.is_empty());
    let done = store.board("done").unwrap();
    assert_eq!(done.tasks.len(), 1);
    assert_eq!(done.tasks[0].id, ids[0]);
    assert_eq!(done.tasks[0].status, "done");
}

#[test]
fn test_update_unknown_task_fails() {
    let mut store = TaskStore::new();
    let ghost = Uuid::new_v4();
    let err = store
        .update_task(ghost, "todo", TaskPatch::default())
        .unwrap_err();
    assert_eq!(err, StoreError::TaskNotFound(ghost));
}

#[test]
fn test_delete_task_removes_only_from_named_board() {
    let (mut store, done_ids) = store_with_tasks("done", &["Shipped", "Archived"]);
    let backlog_id = store.add_task("Untouched", "backlog").expect("add");

    store.delete_task(done_ids[0], "done").expect("delete");

    let done = store.board("done").unwrap();
    assert_eq!(done.tasks.len(), 1);
    assert_eq!(done.tasks[0].id, done_ids[1]);

    let backlog = store.board("backlog").unwrap();
    assert_eq!(backlog.tasks.len(), 1);
    assert_eq!(backlog.tasks[0].id, backlog_id);
}

#[test]
fn test_delete_unknown_task_fails_without_mutation() {
    let (mut store, _) = store_with_tasks("done", &["Kept"]);
    let before = store.revision();

    let ghost = Uuid::new_v4();
    let err = store.delete_task(ghost, "done").unwrap_err();
    assert_eq!(err, StoreError::TaskNotFound(ghost));
    assert_eq!(store.revision(), before);
    assert_eq!(store.board("done").unwrap().tasks.len(), 1);
}

#[test]
fn test_reorder_is_a_permutation() {
    let (mut store, ids) = store_with_tasks("todo", &["A", "B", "C", "D"]);

    store.reorder_tasks(0, 2, "todo").expect("reorder");

    let todo = store.board("todo").unwrap();
    assert_eq!(todo.tasks.len(), 4);
    assert_eq!(todo.tasks[2].id, ids[0]);
    let mut moved: Vec<Uuid> = todo.tasks.iter().map(|t| t.id).collect();
    let mut original = ids.clone();
    moved.sort();
    original.sort();
    assert_eq!(moved, original);
    assert_eq!(titles(&store, "todo"), ["B", "C", "A", "D"]);
}

#[test]
fn test_reorder_moves_not_swaps() {
    let (mut store, _) = store_with_tasks("todo", &["A", "B", "C"]);

    store.reorder_tasks(2, 0, "todo").expect("reorder");
    assert_eq!(titles(&store, "todo"), ["C", "A", "B"]);
}

#[test]
fn test_reorder_out_of_range_source_fails() {
    let (mut store, _) = store_with_tasks("todo", &["A", "B"]);
    let before = store.revision();

    let err = store.reorder_tasks(5, 0, "todo").unwrap_err();
    assert_eq!(
        err,
        StoreError::IndexOutOfRange {
            board_id: "todo".to_string(),
            index: 5,
            len: 2,
        }
    );
    assert_eq!(store.revision(), before);
    assert_eq!(titles(&store, "todo"), ["A", "B"]);
}

#[test]
fn test_reorder_clamps_destination() {
    let (mut store, _) = store_with_tasks("todo", &["A", "B", "C"]);

    store.reorder_tasks(0, 99, "todo").expect("reorder");
    assert_eq!(titles(&store, "todo"), ["B", "C", "A"]);
}

#[test]
fn test_transfer_conserves_total_task_count() {
    let (mut store, ids) = store_with_tasks("todo", &["A", "B"]);

    store
        .transfer_task(ids[0], "todo", "done", None)
        .expect("transfer");

    let todo = store.board("todo").unwrap();
    let done = store.board("done").unwrap();
    assert_eq!(todo.tasks.len(), 1);
    assert_eq!(done.tasks.len(), 1);
    assert!(todo.tasks.iter().all(|t| t.id != ids[0]));
    assert_eq!(done.tasks[0].id, ids[0]);
}

#[test]
fn test_transfer_updates_status_to_destination() {
    let (mut store, ids) = store_with_tasks("todo", &["A"]);

    store
        .transfer_task(ids[0], "todo", "in progress", None)
        .expect("transfer");

    let moved = &store.board("in progress").unwrap().tasks[0];
    assert_eq!(moved.status, "in progress");
}

#[test]
fn test_transfer_inserts_at_destination_index() {
    let (mut store, todo_ids) = store_with_tasks("todo", &["Moved"]);
    store.add_task("First", "done").expect("add");
    store.add_task("Second", "done").expect("add");

    store
        .transfer_task(todo_ids[0], "todo", "done", Some(1))
        .expect("transfer");

    assert_eq!(titles(&store, "done"), ["First", "Moved", "Second"]);
}

#[test]
fn test_transfer_appends_without_destination_index() {
    let (mut store, todo_ids) = store_with_tasks("todo", &["Moved"]);
    store.add_task("First", "done").expect("add");

    store
        .transfer_task(todo_ids[0], "todo", "done", None)
        .expect("transfer");

    assert_eq!(titles(&store, "done"), ["First", "Moved"]);
}

#[test]
fn test_transfer_to_unknown_board_fails_without_mutation() {
    let (mut store, ids) = store_with_tasks("todo", &["A"]);
    let before = store.revision();

    let err = store
        .transfer_task(ids[0], "todo", "nowhere", None)
        .unwrap_err();
    assert_eq!(err, StoreError::BoardNotFound("nowhere".to_string()));
    assert_eq!(store.revision(), before);
    assert_eq!(store.board("todo").unwrap().tasks.len(), 1);
}

#[test]
fn test_revision_bumps_once_per_successful_mutation() {
    let mut store = TaskStore::new();
    assert_eq!(store.revision(), 0);

    let id = store.add_task("A", "todo").expect("add");
    assert_eq!(store.revision(), 1);

    store
        .update_task(
            id,
            "todo",
            TaskPatch {
                title: Some("A2".to_string()),
                status: None,
            },
        )
        .expect("update");
    assert_eq!(store.revision(), 2);

    store.delete_task(id, "todo").expect("delete");
    assert_eq!(store.revision(), 3);

    // Failed mutations leave the revision untouched.
    assert!(store.add_task("x", "nowhere").is_err());
    assert_eq!(store.revision(), 3);
}

#[test]
fn test_visible_tasks_filters_soft_deleted() {
    use taskboard::domain::{Board, Task};

    // Soft-delete marking keeps the task in the sequence; only the views
    // skip it.
    let mut board = Board::new("todo", "To do");
    board.tasks.push(Task::new("Shown", "todo"));
    let mut hidden = Task::new("Hidden", "todo");
    hidden.deleted_at = Some(chrono::Utc::now());
    assert!(hidden.is_deleted());
    board.tasks.push(hidden);

    let visible: Vec<_> = board.visible_tasks().map(|t| t.title.as_str()).collect();
    assert_eq!(visible, ["Shown"]);
    assert_eq!(board.tasks.len(), 2);
}
