mod helpers;

use helpers::{test_db, test_project};
use memoria::session::{
    add_to_session, consolidate, continuation_context, create_session, get_session,
};
use memoria::store::memories::{add_memory, query_memories, MemoryFilter};
use memoria::store::types::SessionStatus;

#[test]
fn session_content_lands_as_tagged_memories() {
    let conn = test_db();
    let project = test_project(&conn);
    let session = create_session(&conn, &project.id, "refactor", "split the parser").unwrap();

    add_to_session(&conn, &session.id, "note", "parser is 3k lines", "conversation", 0.5, None).unwrap();
    add_to_session(&conn, &session.id, "decision", "Decided to split by grammar rule", "decision", 0.8, None).unwrap();

    let tagged = query_memories(
        &conn,
        &project.id,
        &MemoryFilter {
            memory_type: None,
            session_id: Some(session.id.clone()),
        },
        10,
    )
    .unwrap();
    assert_eq!(tagged.len(), 2);
    assert!(tagged.iter().all(|m| m.session_id.as_deref() == Some(session.id.as_str())));
}

#[test]
fn consolidation_is_idempotent() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let session = create_session(&conn, &project.id, "t", "").unwrap();

    add_to_session(&conn, &session.id, "n1", "Decided to use caching", "conversation", 0.5, None).unwrap();
    add_to_session(&conn, &session.id, "n2", "TODO: benchmark the cache", "conversation", 0.5, None).unwrap();

    let first = consolidate(&mut conn, &session.id, 100).unwrap();
    let second = consolidate(&mut conn, &session.id, 100).unwrap();

    assert_eq!(first.id, second.id, "second call returns the stored summary");
    assert_eq!(first.content, second.content);
    assert_eq!(first.decisions, vec!["Decided to use caching".to_string()]);
    assert_eq!(first.pending_actions, vec!["TODO: benchmark the cache".to_string()]);
    assert!(first.compressed_tokens <= 100);
    assert!(first.compression_ratio > 0.0 && first.compression_ratio <= 1.0);

    let after = get_session(&conn, &session.id).unwrap();
    assert_eq!(after.status, SessionStatus::Consolidated);
    assert_eq!(after.summary_id.as_deref(), Some(first.id.as_str()));
    assert!(after.consolidated_at.is_some());
}

#[test]
fn consolidated_session_rejects_new_content() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let session = create_session(&conn, &project.id, "t", "").unwrap();
    add_to_session(&conn, &session.id, "n", "some content", "conversation", 0.5, None).unwrap();
    consolidate(&mut conn, &session.id, 100).unwrap();

    let err =
        add_to_session(&conn, &session.id, "n2", "late content", "conversation", 0.5, None)
            .unwrap_err();
    assert!(err.to_string().contains("already consolidated"));
}

#[test]
fn direct_memory_writes_honor_the_session_scope() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let session = create_session(&conn, &project.id, "t", "").unwrap();
    add_to_session(&conn, &session.id, "n", "Decided to ship", "conversation", 0.5, None).unwrap();
    let summary = consolidate(&mut conn, &session.id, 100).unwrap();

    // Tagging a memory with a consolidated session would orphan it from the
    // stored summary; the store rejects it regardless of entry point.
    let err = add_memory(&conn, &project.id, "note", "late", "late content", 0.5, None, Some(&session.id)).unwrap_err();
    assert!(err.to_string().contains("already consolidated"));

    let err = add_memory(&conn, &project.id, "note", "t", "c", 0.5, None, Some("no-such-session")).unwrap_err();
    assert!(err.is_not_found());

    let tagged = query_memories(
        &conn,
        &project.id,
        &MemoryFilter {
            memory_type: None,
            session_id: Some(session.id.clone()),
        },
        10,
    )
    .unwrap();
    assert_eq!(tagged.len(), 1, "rejected writes must not persist");

    let again = consolidate(&mut conn, &session.id, 100).unwrap();
    assert_eq!(again.id, summary.id);
}

#[test]
fn active_session_accepts_direct_tagged_memories() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let session = create_session(&conn, &project.id, "t", "").unwrap();

    add_memory(&conn, &project.id, "note", "direct", "Decided via direct write", 0.5, None, Some(&session.id)).unwrap();

    let summary = consolidate(&mut conn, &session.id, 100).unwrap();
    assert_eq!(summary.decisions, vec!["Decided via direct write".to_string()]);
}

#[test]
fn empty_session_consolidates_to_empty_summary() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let session = create_session(&conn, &project.id, "t", "").unwrap();

    let summary = consolidate(&mut conn, &session.id, 100).unwrap();
    assert_eq!(summary.original_tokens, 0);
    assert_eq!(summary.compressed_tokens, 0);
    assert_eq!(summary.compression_ratio, 1.0);
    assert!(summary.decisions.is_empty());
}

#[test]
fn continuation_context_sections_in_order() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let session = create_session(&conn, &project.id, "t", "").unwrap();
    add_to_session(&conn, &session.id, "n1", "Decided to drop the ORM", "conversation", 0.5, None).unwrap();
    add_to_session(&conn, &session.id, "n2", "TODO: rewrite the queries", "conversation", 0.5, None).unwrap();

    let text = continuation_context(&mut conn, &session.id, 200).unwrap();

    let project_pos = text.find("## Project:").unwrap();
    let decisions_pos = text.find("## Decisions").unwrap();
    let actions_pos = text.find("## Pending Actions").unwrap();
    let reminder_pos = text.find("## Reminder").unwrap();
    assert!(project_pos < decisions_pos);
    assert!(decisions_pos < actions_pos);
    assert!(actions_pos < reminder_pos);

    assert!(text.contains("- Decided to drop the ORM"));
    assert!(text.contains("- TODO: rewrite the queries"));
    assert!(text.contains("Remember to create or update tasks"));

    // Invoking again consolidates nothing new and renders the same text.
    let again = continuation_context(&mut conn, &session.id, 200).unwrap();
    assert_eq!(text, again);
}

#[test]
fn continuation_context_marks_empty_sections() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let session = create_session(&conn, &project.id, "t", "").unwrap();
    add_to_session(&conn, &session.id, "n", "plain discussion, nothing committed", "conversation", 0.5, None).unwrap();

    let text = continuation_context(&mut conn, &session.id, 200).unwrap();
    assert!(text.contains("(none recorded)"));
}

#[test]
fn unknown_session_is_not_found() {
    let mut conn = test_db();
    assert!(get_session(&conn, "missing").unwrap_err().is_not_found());
    assert!(consolidate(&mut conn, "missing", 100).unwrap_err().is_not_found());
}
