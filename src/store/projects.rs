//! Project identity and lazy creation.
//!
//! A project is identified by its root path: looking up a path returns the
//! existing row or creates one, so the operation is idempotent per path.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::store::types::Project;
use crate::store::{new_id, now};

/// Return the project for `root_path`, creating it if this is the first use
/// of the path. When no name is given, the path's final component is used.
pub fn create_or_get(conn: &Connection, root_path: &str, name: Option<&str>) -> Result<Project> {
    if let Some(existing) = get_by_path(conn, root_path)? {
        return Ok(existing);
    }

    let id = new_id();
    let created_at = now();
    let name = name
        .map(str::to_string)
        .unwrap_or_else(|| default_name(root_path));

    conn.execute(
        "INSERT INTO projects (id, name, root_path, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, root_path, created_at],
    )?;

    tracing::info!(project = %id, path = %root_path, "project created");

    Ok(Project {
        id,
        name,
        root_path: root_path.to_string(),
        created_at,
    })
}

/// Look up a project by root path without creating one.
pub fn get_by_path(conn: &Connection, root_path: &str) -> Result<Option<Project>> {
    let project = conn
        .query_row(
            "SELECT id, name, root_path, created_at FROM projects WHERE root_path = ?1",
            params![root_path],
            |row| {
                Ok(Project {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    root_path: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(project)
}

/// Look up a project by id.
pub fn get(conn: &Connection, project_id: &str) -> Result<Project> {
    conn.query_row(
        "SELECT id, name, root_path, created_at FROM projects WHERE id = ?1",
        params![project_id],
        |row| {
            Ok(Project {
                id: row.get(0)?,
                name: row.get(1)?,
                root_path: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| crate::error::Error::not_found("project", project_id))
}

fn default_name(root_path: &str) -> String {
    std::path::Path::new(root_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root_path.to_string())
}
