mod helpers;

use helpers::{test_db, test_embedding, test_project};
use memoria::search::find_similar;
use memoria::store::memories::{add_memory, query_memories, MemoryFilter};
use memoria::store::projects;
use memoria::store::tasks::{add_task, list_tasks, update_task_status};

#[test]
fn same_path_returns_same_project() {
    let conn = test_db();

    let first = projects::create_or_get(&conn, "/home/dev/api", Some("api")).unwrap();
    let second = projects::create_or_get(&conn, "/home/dev/api", Some("other-name")).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "api", "first registration wins");
}

#[test]
fn add_and_query_memories_newest_first() {
    let conn = test_db();
    let project = test_project(&conn);

    let a = add_memory(&conn, &project.id, "decision", "Use SQLite", "we keep sqlite", 0.9, None, None).unwrap();
    let b = add_memory(&conn, &project.id, "convention", "Naming", "snake_case modules", 0.5, None, None).unwrap();

    let all = query_memories(&conn, &project.id, &MemoryFilter::default(), 10).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, b.id, "newest first");
    assert_eq!(all[1].id, a.id);

    let decisions = query_memories(
        &conn,
        &project.id,
        &MemoryFilter {
            memory_type: Some("decision".to_string()),
            session_id: None,
        },
        10,
    )
    .unwrap();
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].title, "Use SQLite");
}

#[test]
fn memory_importance_is_validated_before_write() {
    let conn = test_db();
    let project = test_project(&conn);

    let err = add_memory(&conn, &project.id, "note", "t", "c", 1.5, None, None).unwrap_err();
    assert!(err.to_string().contains("importance"));

    let all = query_memories(&conn, &project.id, &MemoryFilter::default(), 10).unwrap();
    assert!(all.is_empty(), "invalid write must not persist");
}

#[test]
fn memory_for_unknown_project_is_not_found() {
    let conn = test_db();
    let err = add_memory(&conn, "nope", "note", "t", "c", 0.5, None, None).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn similar_memories_respect_threshold_and_order() {
    let conn = test_db();
    let project = test_project(&conn);

    let emb_a = test_embedding(0);
    let emb_b = test_embedding(3);

    let a = add_memory(&conn, &project.id, "note", "about deploys", "deploy pipeline notes", 0.5, Some(&emb_a), None).unwrap();
    add_memory(&conn, &project.id, "note", "unrelated", "lunch menu", 0.5, Some(&emb_b), None).unwrap();
    // No embedding stored; never eligible for semantic search.
    add_memory(&conn, &project.id, "note", "plain", "plain text", 0.5, None, None).unwrap();

    let candidates = query_memories(&conn, &project.id, &MemoryFilter::default(), 100).unwrap();
    let results = find_similar(&emb_a, candidates, 0.7, 10);

    assert_eq!(results.len(), 1, "orthogonal and vectorless rows are excluded");
    assert_eq!(results[0].memory.id, a.id);
    assert!(results[0].similarity > 0.99);
}

#[test]
fn task_lifecycle() {
    let conn = test_db();
    let project = test_project(&conn);

    let task = add_task(&conn, &project.id, "Fix login bug", "500 on bad password", "high", "bug").unwrap();
    assert_eq!(task.status.as_str(), "pending");

    let updated = update_task_status(&conn, &task.id, "in_progress").unwrap();
    assert_eq!(updated.status.as_str(), "in_progress");
    assert_ne!(updated.updated_at, "", "status change stamps updated_at");

    let pending = list_tasks(&conn, &project.id, Some("pending"), 10).unwrap();
    assert!(pending.is_empty());

    let in_progress = list_tasks(&conn, &project.id, Some("in_progress"), 10).unwrap();
    assert_eq!(in_progress.len(), 1);
}

#[test]
fn invalid_priority_rejected_before_write() {
    let conn = test_db();
    let project = test_project(&conn);

    let err = add_task(&conn, &project.id, "t", "", "urgent", "bug").unwrap_err();
    assert!(err.to_string().contains("invalid argument"));
    assert!(list_tasks(&conn, &project.id, None, 10).unwrap().is_empty());
}
