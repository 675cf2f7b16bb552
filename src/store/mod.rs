//! Durable relational store: projects, memories, tasks, and statistics.
//!
//! Operations are free functions over a `rusqlite::Connection` (the tools
//! layer owns the `Arc<Mutex<_>>` and `spawn_blocking`). Each public operation
//! commits exactly one logical unit — one project, one memory, one task — so
//! no multi-step rollback is ever needed.

pub mod memories;
pub mod projects;
pub mod stats;
pub mod tasks;
pub mod types;

use rusqlite::Connection;

use crate::error::{Error, Result};

/// Serialize an f32 embedding to little-endian bytes for BLOB storage.
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Deserialize a BLOB back into an f32 vector. Trailing partial floats are
/// dropped rather than erroring; stored blobs are always a multiple of 4.
pub fn embedding_from_bytes(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Fail with `NotFound` unless the project exists. Keeps the no-orphans
/// invariant typed instead of leaking a foreign-key constraint error.
pub(crate) fn ensure_project(conn: &Connection, project_id: &str) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1)",
        rusqlite::params![project_id],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(Error::not_found("project", project_id))
    }
}

/// RFC 3339 timestamp for the current instant.
pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Time-sortable UUID v7 for new entities.
pub(crate) fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_bytes_roundtrip() {
        let original = vec![0.0f32, 1.0, -2.5, 3.25];
        let bytes = embedding_to_bytes(&original);
        assert_eq!(bytes.len(), 16);
        assert_eq!(embedding_from_bytes(&bytes), original);
    }

    #[test]
    fn empty_embedding_roundtrip() {
        assert!(embedding_from_bytes(&embedding_to_bytes(&[])).is_empty());
    }
}
