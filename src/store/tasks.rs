//! Task write and read paths.
//!
//! Enum values arrive as strings from the tool boundary and are parsed here,
//! before any row is touched — a malformed priority or status is an
//! `InvalidArgument` with nothing persisted. Status transitions are
//! unconstrained; every transition stamps `updated_at`.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Error, Result};
use crate::store::types::{Priority, Task, TaskStatus};
use crate::store::{ensure_project, new_id, now};

/// Create a new task in `pending` status.
pub fn add_task(
    conn: &Connection,
    project_id: &str,
    title: &str,
    description: &str,
    priority: &str,
    category: &str,
) -> Result<Task> {
    let priority: Priority = priority.parse().map_err(Error::InvalidArgument)?;
    if title.trim().is_empty() {
        return Err(Error::invalid("task title must not be empty"));
    }
    ensure_project(conn, project_id)?;

    let id = new_id();
    let created_at = now();

    conn.execute(
        "INSERT INTO tasks (id, project_id, title, description, priority, category, status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7, ?7)",
        params![
            id,
            project_id,
            title,
            description,
            priority.as_str(),
            category,
            created_at,
        ],
    )?;

    Ok(Task {
        id,
        project_id: project_id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        priority,
        category: category.to_string(),
        status: TaskStatus::Pending,
        updated_at: created_at.clone(),
        created_at,
    })
}

/// List a project's tasks newest-first, optionally filtered by status.
pub fn list_tasks(
    conn: &Connection,
    project_id: &str,
    status: Option<&str>,
    limit: usize,
) -> Result<Vec<Task>> {
    let status = status
        .map(|s| s.parse::<TaskStatus>().map_err(Error::InvalidArgument))
        .transpose()?;
    ensure_project(conn, project_id)?;

    let mut tasks = Vec::new();
    match status {
        Some(status) => {
            let mut stmt = conn.prepare(
                "SELECT id, project_id, title, description, priority, category, status, created_at, updated_at \
                 FROM tasks WHERE project_id = ?1 AND status = ?2 \
                 ORDER BY created_at DESC, rowid DESC LIMIT ?3",
            )?;
            let rows = stmt.query_map(params![project_id, status.as_str(), limit as i64], row_to_task)?;
            for task in rows {
                tasks.push(task?);
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, project_id, title, description, priority, category, status, created_at, updated_at \
                 FROM tasks WHERE project_id = ?1 \
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![project_id, limit as i64], row_to_task)?;
            for task in rows {
                tasks.push(task?);
            }
        }
    }

    Ok(tasks)
}

/// Move a task to a new status, stamping `updated_at`. Unknown task ids are
/// `NotFound`; no row is ever created by this path.
pub fn update_task_status(conn: &Connection, task_id: &str, status: &str) -> Result<Task> {
    let status: TaskStatus = status.parse().map_err(Error::InvalidArgument)?;
    let updated_at = now();

    let rows = conn.execute(
        "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), updated_at, task_id],
    )?;
    if rows == 0 {
        return Err(Error::not_found("task", task_id));
    }

    get_task(conn, task_id)
}

/// Fetch one task by id.
pub fn get_task(conn: &Connection, task_id: &str) -> Result<Task> {
    conn.query_row(
        "SELECT id, project_id, title, description, priority, category, status, created_at, updated_at \
         FROM tasks WHERE id = ?1",
        params![task_id],
        row_to_task,
    )
    .optional()?
    .ok_or_else(|| Error::not_found("task", task_id))
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let priority: String = row.get(4)?;
    let status: String = row.get(6)?;
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        // Stored values passed the CHECK constraints; a parse failure here
        // means the database was edited out-of-band.
        priority: priority.parse().unwrap_or(Priority::Medium),
        category: row.get(5)?,
        status: status.parse().unwrap_or(TaskStatus::Pending),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
