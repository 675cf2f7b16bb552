//! Chat sessions, consolidation, and continuation context.
//!
//! A session is a temporary aggregation scope: memories added while it is
//! active are tagged with its id. Consolidation concatenates the accumulated
//! content in creation order, compresses it to the configured budget, and
//! persists one immutable [`ContextSummary`]. The transition to `consolidated`
//! happens exactly once — the status check and the summary write share a
//! transaction, so a second caller observes the first's result instead of
//! recomputing.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::compress;
use crate::error::{Error, Result};
use crate::store::types::{ChatSession, ContextSummary, Memory, SessionStatus};
use crate::store::{memories, new_id, now, projects};

/// Closing line of every continuation context, carried over from the
/// rendered task reminder the assistant expects.
const REMINDER: &str = "Remember to create or update tasks for the current project as needed.";

/// Start a new session in `active` status.
pub fn create_session(
    conn: &Connection,
    project_id: &str,
    title: &str,
    objective: &str,
) -> Result<ChatSession> {
    crate::store::ensure_project(conn, project_id)?;

    let id = new_id();
    let created_at = now();
    conn.execute(
        "INSERT INTO chat_sessions (id, project_id, title, objective, status, created_at) \
         VALUES (?1, ?2, ?3, ?4, 'active', ?5)",
        params![id, project_id, title, objective, created_at],
    )?;

    tracing::info!(session = %id, "chat session started");

    Ok(ChatSession {
        id,
        project_id: project_id.to_string(),
        title: title.to_string(),
        objective: objective.to_string(),
        status: SessionStatus::Active,
        summary_id: None,
        created_at,
        consolidated_at: None,
    })
}

/// Fetch one session by id.
pub fn get_session(conn: &Connection, session_id: &str) -> Result<ChatSession> {
    conn.query_row(
        "SELECT id, project_id, title, objective, status, summary_id, created_at, consolidated_at \
         FROM chat_sessions WHERE id = ?1",
        params![session_id],
        row_to_session,
    )
    .optional()?
    .ok_or_else(|| Error::not_found("chat session", session_id))
}

/// Append content to an active session. The content is persisted as an
/// ordinary memory tagged with the session id, so it participates in search
/// immediately and in consolidation later. Consolidated sessions are closed
/// aggregation scopes and reject further content — `memories::add_memory`
/// enforces that for every session-tagged write, including direct ones.
pub fn add_to_session(
    conn: &Connection,
    session_id: &str,
    title: &str,
    content: &str,
    memory_type: &str,
    importance: f64,
    embedding: Option<&[f32]>,
) -> Result<Memory> {
    let session = get_session(conn, session_id)?;

    memories::add_memory(
        conn,
        &session.project_id,
        memory_type,
        title,
        content,
        importance,
        embedding,
        Some(session_id),
    )
}

/// Consolidate a session into one [`ContextSummary`].
///
/// Idempotent: a consolidated session returns its stored summary without
/// recomputation. The check and the write share one transaction.
pub fn consolidate(
    conn: &mut Connection,
    session_id: &str,
    target_tokens: usize,
) -> Result<ContextSummary> {
    let tx = conn.transaction()?;

    let session = tx
        .query_row(
            "SELECT id, project_id, title, objective, status, summary_id, created_at, consolidated_at \
             FROM chat_sessions WHERE id = ?1",
            params![session_id],
            row_to_session,
        )
        .optional()?
        .ok_or_else(|| Error::not_found("chat session", session_id))?;

    if session.status == SessionStatus::Consolidated {
        let summary_id = session
            .summary_id
            .ok_or_else(|| Error::not_found("context summary for session", session_id))?;
        let summary = get_summary(&tx, &summary_id)?;
        tx.commit()?;
        return Ok(summary);
    }

    // Accumulated content in creation order.
    let combined = memories::session_contents(&tx, session_id)?.join("\n\n");

    let extracted = compress::summarize(&combined);
    let compressed = compress::compress(&combined, target_tokens);

    let summary_id = new_id();
    let created_at = now();
    tx.execute(
        "INSERT INTO context_summaries \
         (id, project_id, source_ref, content, original_tokens, compressed_tokens, compression_ratio, \
          key_points, decisions, pending_actions, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            summary_id,
            session.project_id,
            session_id,
            compressed.compressed_content,
            compressed.original_tokens as i64,
            compressed.compressed_tokens as i64,
            compressed.compression_ratio,
            serde_json::to_string(&extracted.key_points)?,
            serde_json::to_string(&extracted.decisions)?,
            serde_json::to_string(&extracted.pending_actions)?,
            created_at,
        ],
    )?;

    tx.execute(
        "UPDATE chat_sessions SET status = 'consolidated', summary_id = ?1, consolidated_at = ?2 \
         WHERE id = ?3 AND status = 'active'",
        params![summary_id, created_at, session_id],
    )?;

    tx.commit()?;

    tracing::info!(
        session = %session_id,
        summary = %summary_id,
        ratio = compressed.compression_ratio,
        "session consolidated"
    );

    Ok(ContextSummary {
        id: summary_id,
        project_id: session.project_id,
        source_ref: session_id.to_string(),
        content: compressed.compressed_content,
        original_tokens: compressed.original_tokens,
        compressed_tokens: compressed.compressed_tokens,
        compression_ratio: compressed.compression_ratio,
        key_points: extracted.key_points,
        decisions: extracted.decisions,
        pending_actions: extracted.pending_actions,
        created_at,
    })
}

/// Render the continuation text for a successor session, consolidating on
/// demand. Sections appear in fixed order — project, decisions, pending
/// actions, reminder — so the output is deterministic given the same summary.
pub fn continuation_context(
    conn: &mut Connection,
    session_id: &str,
    target_tokens: usize,
) -> Result<String> {
    let summary = consolidate(conn, session_id, target_tokens)?;
    let project = projects::get(conn, &summary.project_id)?;

    let mut out = String::new();
    out.push_str(&format!(
        "## Project: {} ({})\n",
        project.name, project.root_path
    ));

    out.push_str("\n## Decisions\n");
    if summary.decisions.is_empty() {
        out.push_str("(none recorded)\n");
    } else {
        for decision in &summary.decisions {
            out.push_str(&format!("- {decision}\n"));
        }
    }

    out.push_str("\n## Pending Actions\n");
    if summary.pending_actions.is_empty() {
        out.push_str("(none recorded)\n");
    } else {
        for action in &summary.pending_actions {
            out.push_str(&format!("- {action}\n"));
        }
    }

    out.push_str(&format!("\n## Reminder\n{REMINDER}\n"));

    Ok(out)
}

fn get_summary(conn: &Connection, summary_id: &str) -> Result<ContextSummary> {
    conn.query_row(
        "SELECT id, project_id, source_ref, content, original_tokens, compressed_tokens, \
                compression_ratio, key_points, decisions, pending_actions, created_at \
         FROM context_summaries WHERE id = ?1",
        params![summary_id],
        row_to_summary,
    )
    .optional()?
    .ok_or_else(|| Error::not_found("context summary", summary_id))
}

fn row_to_session(row: &Row<'_>) -> rusqlite::Result<ChatSession> {
    let status: String = row.get(4)?;
    Ok(ChatSession {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        objective: row.get(3)?,
        status: status.parse().unwrap_or(SessionStatus::Active),
        summary_id: row.get(5)?,
        created_at: row.get(6)?,
        consolidated_at: row.get(7)?,
    })
}

fn row_to_summary(row: &Row<'_>) -> rusqlite::Result<ContextSummary> {
    let key_points: String = row.get(7)?;
    let decisions: String = row.get(8)?;
    let pending_actions: String = row.get(9)?;
    Ok(ContextSummary {
        id: row.get(0)?,
        project_id: row.get(1)?,
        source_ref: row.get(2)?,
        content: row.get(3)?,
        original_tokens: row.get::<_, i64>(4)? as usize,
        compressed_tokens: row.get::<_, i64>(5)? as usize,
        compression_ratio: row.get(6)?,
        key_points: serde_json::from_str(&key_points).unwrap_or_default(),
        decisions: serde_json::from_str(&decisions).unwrap_or_default(),
        pending_actions: serde_json::from_str(&pending_actions).unwrap_or_default(),
        created_at: row.get(10)?,
    })
}
