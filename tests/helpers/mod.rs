#![allow(dead_code)]

use memoria::db;
use memoria::store::projects;
use memoria::store::types::Project;
use rusqlite::Connection;

/// Open a fresh in-memory database with the schema applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// Create a project for tests to hang entities off.
pub fn test_project(conn: &Connection) -> Project {
    projects::create_or_get(conn, "/tmp/test-project", Some("test-project")).unwrap()
}

/// Generate a deterministic 8-dim embedding with a spike at position `seed`.
/// Each seed produces a distinct, orthogonal vector.
pub fn test_embedding(seed: u8) -> Vec<f32> {
    let mut v = vec![0.0f32; 8];
    v[seed as usize % 8] = 1.0;
    v
}

/// Generate an embedding similar to `base` with small perturbation.
/// The result has high cosine similarity to `base`.
pub fn similar_embedding(base: &[f32]) -> Vec<f32> {
    let mut v = base.to_vec();
    for (i, x) in v.iter_mut().enumerate() {
        *x += 0.05 * (i as f32 % 3.0);
    }
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}
