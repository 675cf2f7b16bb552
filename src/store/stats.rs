//! Entity counts, per project and database-wide.

use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::store::ensure_project;

/// Counts for one project's entities.
#[derive(Debug, Serialize)]
pub struct ProjectStats {
    pub project_id: String,
    pub memories: i64,
    pub tasks: i64,
    pub pending_tasks: i64,
    pub thinking_chains: i64,
    pub chat_sessions: i64,
    pub context_summaries: i64,
}

/// Database-wide counts, for the CLI stats report and health checks.
#[derive(Debug, Serialize)]
pub struct DatabaseStats {
    pub projects: i64,
    pub memories: i64,
    pub tasks: i64,
    pub thinking_chains: i64,
    pub thinking_steps: i64,
    pub chat_sessions: i64,
    pub context_summaries: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_size_bytes: Option<u64>,
    pub generated_at: String,
}

/// Count one project's entities across all tables.
pub fn project_stats(conn: &Connection, project_id: &str) -> Result<ProjectStats> {
    ensure_project(conn, project_id)?;

    let count = |sql: &str| -> Result<i64> {
        Ok(conn.query_row(sql, params![project_id], |row| row.get(0))?)
    };

    Ok(ProjectStats {
        project_id: project_id.to_string(),
        memories: count("SELECT COUNT(*) FROM memories WHERE project_id = ?1")?,
        tasks: count("SELECT COUNT(*) FROM tasks WHERE project_id = ?1")?,
        pending_tasks: count(
            "SELECT COUNT(*) FROM tasks WHERE project_id = ?1 AND status = 'pending'",
        )?,
        thinking_chains: count("SELECT COUNT(*) FROM thinking_chains WHERE project_id = ?1")?,
        chat_sessions: count("SELECT COUNT(*) FROM chat_sessions WHERE project_id = ?1")?,
        context_summaries: count("SELECT COUNT(*) FROM context_summaries WHERE project_id = ?1")?,
    })
}

/// Count all entities in the database.
pub fn database_stats(conn: &Connection, db_path: Option<&Path>) -> Result<DatabaseStats> {
    let count = |table: &str| -> Result<i64> {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?)
    };

    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len());

    Ok(DatabaseStats {
        projects: count("projects")?,
        memories: count("memories")?,
        tasks: count("tasks")?,
        thinking_chains: count("thinking_chains")?,
        thinking_steps: count("thinking_steps")?,
        chat_sessions: count("chat_sessions")?,
        context_summaries: count("context_summaries")?,
        db_size_bytes,
        generated_at: super::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::store::{memories, projects, tasks};

    #[test]
    fn counts_reflect_writes() {
        let conn = db::open_memory_database().unwrap();
        let project = projects::create_or_get(&conn, "/tmp/stats", None).unwrap();

        memories::add_memory(&conn, &project.id, "note", "t", "c", 0.5, None, None).unwrap();
        tasks::add_task(&conn, &project.id, "task", "", "medium", "chore").unwrap();

        let stats = project_stats(&conn, &project.id).unwrap();
        assert_eq!(stats.memories, 1);
        assert_eq!(stats.tasks, 1);
        assert_eq!(stats.pending_tasks, 1);
        assert_eq!(stats.context_summaries, 0);

        let db_stats = database_stats(&conn, None).unwrap();
        assert_eq!(db_stats.projects, 1);
        assert_eq!(db_stats.memories, 1);
        assert!(db_stats.db_size_bytes.is_none());
    }

    #[test]
    fn unknown_project_is_not_found() {
        let conn = db::open_memory_database().unwrap();
        assert!(project_stats(&conn, "missing").unwrap_err().is_not_found());
    }
}
