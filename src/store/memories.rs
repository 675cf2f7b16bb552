//! Memory write and read paths.
//!
//! [`add_memory`] persists one memory atomically (single-row insert).
//! [`query_memories`] lists newest-first with optional type and session
//! filters — the non-semantic fallback retrieval that callers use when the
//! embedding collaborator is unavailable.

use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use crate::error::{Error, Result};
use crate::store::types::Memory;
use crate::store::{embedding_from_bytes, embedding_to_bytes, ensure_project, new_id, now};

/// Optional filters for [`query_memories`].
#[derive(Debug, Default, Clone)]
pub struct MemoryFilter {
    pub memory_type: Option<String>,
    pub session_id: Option<String>,
}

/// Persist a new memory. The embedding is optional; a memory stored without
/// one simply never participates in semantic search. A session tag must name
/// an active session — a consolidated session is a closed aggregation scope
/// and its summary would never cover the new row.
#[allow(clippy::too_many_arguments)]
pub fn add_memory(
    conn: &Connection,
    project_id: &str,
    memory_type: &str,
    title: &str,
    content: &str,
    importance: f64,
    embedding: Option<&[f32]>,
    session_id: Option<&str>,
) -> Result<Memory> {
    if !(0.0..=1.0).contains(&importance) {
        return Err(Error::invalid(format!(
            "importance must be within [0.0, 1.0], got {importance}"
        )));
    }
    if memory_type.trim().is_empty() {
        return Err(Error::invalid("memory type must not be empty"));
    }
    ensure_project(conn, project_id)?;
    if let Some(session_id) = session_id {
        ensure_session_active(conn, session_id)?;
    }

    let id = new_id();
    let created_at = now();
    let embedding_bytes = embedding.map(embedding_to_bytes);

    conn.execute(
        "INSERT INTO memories (id, project_id, session_id, type, title, content, embedding, importance, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            id,
            project_id,
            session_id,
            memory_type,
            title,
            content,
            embedding_bytes,
            importance,
            created_at,
        ],
    )?;

    Ok(Memory {
        id,
        project_id: project_id.to_string(),
        session_id: session_id.map(str::to_string),
        memory_type: memory_type.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        embedding: embedding.map(<[f32]>::to_vec),
        importance,
        created_at,
    })
}

/// List a project's memories newest-first, optionally filtered by type and
/// session. Reads reflect the latest committed writes.
pub fn query_memories(
    conn: &Connection,
    project_id: &str,
    filter: &MemoryFilter,
    limit: usize,
) -> Result<Vec<Memory>> {
    ensure_project(conn, project_id)?;

    let mut sql = String::from(
        "SELECT id, project_id, session_id, type, title, content, embedding, importance, created_at \
         FROM memories WHERE project_id = ?1",
    );
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(project_id.to_string())];

    if let Some(memory_type) = &filter.memory_type {
        sql.push_str(&format!(" AND type = ?{}", params.len() + 1));
        params.push(Box::new(memory_type.clone()));
    }
    if let Some(session_id) = &filter.session_id {
        sql.push_str(&format!(" AND session_id = ?{}", params.len() + 1));
        params.push(Box::new(session_id.clone()));
    }

    sql.push_str(&format!(
        " ORDER BY created_at DESC, rowid DESC LIMIT ?{}",
        params.len() + 1
    ));
    params.push(Box::new(limit as i64));

    let mut stmt = conn.prepare(&sql)?;
    let memories = stmt
        .query_map(params_from_iter(params.iter().map(|p| p.as_ref())), row_to_memory)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(memories)
}

/// Contents of a session's accumulated memories in creation order, for
/// consolidation.
pub fn session_contents(conn: &Connection, session_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT content FROM memories WHERE session_id = ?1 ORDER BY created_at ASC, rowid ASC",
    )?;
    let contents = stmt
        .query_map(rusqlite::params![session_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(contents)
}

/// Fail unless `session_id` names an active session. Consolidated sessions
/// reject new content so the stored summary stays complete.
fn ensure_session_active(conn: &Connection, session_id: &str) -> Result<()> {
    let status: Option<String> = conn
        .query_row(
            "SELECT status FROM chat_sessions WHERE id = ?1",
            rusqlite::params![session_id],
            |row| row.get(0),
        )
        .optional()?;
    match status.as_deref() {
        None => Err(Error::not_found("chat session", session_id)),
        Some("active") => Ok(()),
        Some(_) => Err(Error::invalid(format!(
            "session {session_id} is already consolidated"
        ))),
    }
}

pub(crate) fn row_to_memory(row: &Row<'_>) -> rusqlite::Result<Memory> {
    let embedding: Option<Vec<u8>> = row.get(6)?;
    Ok(Memory {
        id: row.get(0)?,
        project_id: row.get(1)?,
        session_id: row.get(2)?,
        memory_type: row.get(3)?,
        title: row.get(4)?,
        content: row.get(5)?,
        embedding: embedding.map(|bytes| embedding_from_bytes(&bytes)),
        importance: row.get(7)?,
        created_at: row.get(8)?,
    })
}
