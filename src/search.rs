//! Semantic ranking of candidate memories against a query vector.
//!
//! Pure with respect to the store: candidates arrive with their stored
//! embeddings and are scored by cosine similarity in-process. Candidates
//! lacking an embedding are excluded, never scored as zero. Query-embedding
//! failure is the caller's concern — the tools layer degrades to an empty
//! result and falls back to recency-ordered retrieval.

use serde::Serialize;
use std::cmp::Ordering;

use crate::store::types::Memory;

/// Default similarity floor for [`find_similar`].
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// A candidate memory paired with its similarity score.
#[derive(Debug, Serialize)]
pub struct SimilarMemory {
    #[serde(flatten)]
    pub memory: Memory,
    pub similarity: f64,
}

/// Cosine similarity between two vectors. Returns 0.0 for mismatched lengths
/// or zero-magnitude inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Rank `candidates` against `query_embedding`: similarity at or above
/// `threshold`, sorted descending, ties broken by most-recent `created_at`.
pub fn find_similar(
    query_embedding: &[f32],
    candidates: Vec<Memory>,
    threshold: f64,
    limit: usize,
) -> Vec<SimilarMemory> {
    let mut scored: Vec<SimilarMemory> = candidates
        .into_iter()
        .filter_map(|memory| {
            let embedding = memory.embedding.as_deref()?;
            let similarity = cosine_similarity(query_embedding, embedding);
            (similarity >= threshold).then_some(SimilarMemory { memory, similarity })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.memory.created_at.cmp(&a.memory.created_at))
    });
    scored.truncate(limit);
    scored
}
