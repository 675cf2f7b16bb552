use memoria::db;

#[test]
fn open_database_creates_file_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("memory.db");

    let conn = db::open_database(&db_path).unwrap();
    assert!(db_path.exists(), "missing parent directories are created");

    // Every table exists and is queryable.
    for table in [
        "projects",
        "memories",
        "tasks",
        "thinking_chains",
        "thinking_steps",
        "context_summaries",
        "chat_sessions",
        "schema_meta",
    ] {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .unwrap();
        assert!(count >= 0);
    }

    let version = db::get_meta(&conn, "schema_version").unwrap();
    assert_eq!(version.as_deref(), Some("1"));
}

#[test]
fn reopen_preserves_data() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("memory.db");

    {
        let conn = db::open_database(&db_path).unwrap();
        memoria::store::projects::create_or_get(&conn, "/tmp/p", None).unwrap();
    }

    let conn = db::open_database(&db_path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = db::open_memory_database().unwrap();
    let result = conn.execute(
        "INSERT INTO memories (id, project_id, type, title, content, importance, created_at) \
         VALUES ('m1', 'no-such-project', 'note', 't', 'c', 0.5, '2026-01-01T00:00:00Z')",
        [],
    );
    assert!(result.is_err());
}
