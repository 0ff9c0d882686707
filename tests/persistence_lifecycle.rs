//! Save and reload through the task file, as the server does across restarts.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use rstest::rstest;

use common::{SEED_TASKS_JSON, router, seed_tasks, send};
use task_tracker::api::AppState;
use task_tracker::infrastructure::{TaskFile, TaskStore};

#[rstest]
#[tokio::test]
async fn test_reload_recomputes_counter_from_surviving_ids() {
    let directory = tempfile::tempdir().unwrap();
    let task_file = TaskFile::new(directory.path().join("tasks.json"));

    let store = Arc::new(TaskStore::new());
    let app = router(AppState::new(Arc::clone(&store)));
    send(&app, Method::POST, "/tasks", Some(r#"{"title":"Keep me"}"#)).await;
    send(&app, Method::POST, "/tasks", Some(r#"{"title":"Drop me"}"#)).await;
    send(&app, Method::DELETE, "/tasks/2", None).await;
    task_file.save(&store).unwrap();

    let reloaded = Arc::new(TaskStore::new());
    task_file.load(&reloaded).unwrap();
    let app = router(AppState::new(Arc::clone(&reloaded)));

    let listed = send(&app, Method::GET, "/tasks", None).await;
    assert_eq!(listed.body, r#"[{"id":1,"title":"Keep me","completed":false}]"#);

    let created = send(&app, Method::POST, "/tasks", Some(r#"{"title":"After restart"}"#)).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(
        created.body,
        r#"{"id":2,"title":"After restart","completed":false}"#
    );
}

#[rstest]
#[tokio::test]
async fn test_loaded_file_seeds_counter_from_max_id() {
    let directory = tempfile::tempdir().unwrap();
    let task_file = TaskFile::new(directory.path().join("tasks.json"));
    task_file.write(&seed_tasks()).unwrap();

    let store = Arc::new(TaskStore::new());
    assert_eq!(task_file.load(&store).unwrap(), 3);
    let app = router(AppState::new(store));

    let listed = send(&app, Method::GET, "/tasks", None).await;
    assert_eq!(listed.body, SEED_TASKS_JSON);

    let created = send(&app, Method::POST, "/tasks", Some(r#"{"title":"Next"}"#)).await;
    assert_eq!(created.body, r#"{"id":124,"title":"Next","completed":false}"#);
}

#[rstest]
fn test_second_save_keeps_backup_of_first() {
    let directory = tempfile::tempdir().unwrap();
    let task_file = TaskFile::new(directory.path().join("tasks.json"));
    let store = TaskStore::with_tasks(seed_tasks());

    task_file.save(&store).unwrap();
    let first = std::fs::read(task_file.path()).unwrap();
    store.delete(task_tracker::domain::TaskId::new(1)).unwrap();
    task_file.save(&store).unwrap();

    assert_eq!(std::fs::read(task_file.backup_path()).unwrap(), first);
    assert_eq!(task_file.read().unwrap().len(), 2);
}
