//! Sequential thinking engine.
//!
//! A chain walks five canonical stages: analysis → planning → execution →
//! validation → reflection. Stage order is soft guidance, not enforcement —
//! any recognized stage is accepted at any time (revisiting `analysis` after
//! `validation` is legitimate), and an unrecognized stage value is recorded
//! verbatim with the suggested next stage defaulting to `analysis`. Steps are
//! append-only and ordered by arrival.
//!
//! Every step is also mirrored as a Memory of type `thinking_step` so it
//! participates in search and retention alongside ordinary memories.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::types::{ChainStatus, ThinkingChain, ThinkingStep};
use crate::store::{memories, new_id, now};
use crate::tokens;

/// The five canonical reasoning stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Analysis,
    Planning,
    Execution,
    Validation,
    Reflection,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Planning => "planning",
            Self::Execution => "execution",
            Self::Validation => "validation",
            Self::Reflection => "reflection",
        }
    }

    /// The stage immediately following this one, or `None` after reflection.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Self::Analysis => Some(Self::Planning),
            Self::Planning => Some(Self::Execution),
            Self::Execution => Some(Self::Validation),
            Self::Validation => Some(Self::Reflection),
            Self::Reflection => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "analysis" => Ok(Self::Analysis),
            "planning" => Ok(Self::Planning),
            "execution" => Ok(Self::Execution),
            "validation" => Ok(Self::Validation),
            "reflection" => Ok(Self::Reflection),
            _ => Err(format!("unknown stage: {s}")),
        }
    }
}

/// Suggested next stage for a just-recorded stage value. Unrecognized stage
/// strings restart the suggestion at `analysis` rather than failing, keeping
/// the workflow resilient to caller error.
pub fn next_stage(stage: &str) -> Option<Stage> {
    match stage.parse::<Stage>() {
        Ok(stage) => stage.next(),
        Err(_) => Some(Stage::Analysis),
    }
}

/// Result of appending one step.
#[derive(Debug, Serialize)]
pub struct StepOutcome {
    pub step: ThinkingStep,
    /// Suggested stage to record next; `None` once reflection is reached.
    pub next_stage: Option<Stage>,
    /// `true` when this step closed the chain (a reflection step on an
    /// active chain).
    pub chain_completed: bool,
}

/// A chain with its ordered steps and aggregates.
#[derive(Debug, Serialize)]
pub struct ChainDetail {
    #[serde(flatten)]
    pub chain: ThinkingChain,
    pub steps: Vec<ThinkingStep>,
    /// Mean of step confidences; 0.0 for an empty chain.
    pub average_confidence: f64,
    /// Sum of `estimate(step.content)` over all steps.
    pub total_tokens: usize,
}

/// Start a new chain at the `analysis` stage.
pub fn create_chain(conn: &Connection, project_id: &str, objective: &str) -> Result<ThinkingChain> {
    crate::store::ensure_project(conn, project_id)?;
    if objective.trim().is_empty() {
        return Err(Error::invalid("chain objective must not be empty"));
    }

    let id = new_id();
    let created_at = now();
    conn.execute(
        "INSERT INTO thinking_chains (id, project_id, objective, status, created_at) \
         VALUES (?1, ?2, ?3, 'active', ?4)",
        params![id, project_id, objective, created_at],
    )?;

    tracing::info!(chain = %id, "thinking chain started");

    Ok(ThinkingChain {
        id,
        project_id: project_id.to_string(),
        objective: objective.to_string(),
        status: ChainStatus::Active,
        created_at,
    })
}

/// Append one step to a chain.
///
/// Runs in a transaction: the step row, its memory mirror, and any chain
/// completion commit together. Recording a `reflection` step on an active
/// chain closes it.
pub fn add_step(
    conn: &mut Connection,
    chain_id: &str,
    stage: &str,
    title: &str,
    content: &str,
    reasoning: &str,
    confidence: f64,
) -> Result<StepOutcome> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(Error::invalid(format!(
            "confidence must be within [0.0, 1.0], got {confidence}"
        )));
    }
    if stage.trim().is_empty() {
        return Err(Error::invalid("stage must not be empty"));
    }

    let tx = conn.transaction()?;

    let chain_row: Option<(String, String)> = tx
        .query_row(
            "SELECT project_id, status FROM thinking_chains WHERE id = ?1",
            params![chain_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    let (project_id, chain_status) =
        chain_row.ok_or_else(|| Error::not_found("thinking chain", chain_id))?;

    let id = new_id();
    let created_at = now();
    tx.execute(
        "INSERT INTO thinking_steps (id, chain_id, stage, title, content, reasoning, confidence, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![id, chain_id, stage, title, content, reasoning, confidence, created_at],
    )?;

    // Mirror as an ordinary memory so the step shows up in search and
    // retention.
    memories::add_memory(
        &tx,
        &project_id,
        "thinking_step",
        &format!("{} Step: {title}", capitalize(stage)),
        &format!("Content: {content}\n\nReasoning: {reasoning}"),
        confidence,
        None,
        None,
    )?;

    let parsed_stage = stage.parse::<Stage>().ok();
    let chain_completed =
        parsed_stage == Some(Stage::Reflection) && chain_status == ChainStatus::Active.as_str();
    if chain_completed {
        tx.execute(
            "UPDATE thinking_chains SET status = 'completed' WHERE id = ?1",
            params![chain_id],
        )?;
    }

    tx.commit()?;

    Ok(StepOutcome {
        step: ThinkingStep {
            id,
            chain_id: chain_id.to_string(),
            stage: stage.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            reasoning: reasoning.to_string(),
            confidence,
            created_at,
        },
        next_stage: next_stage(stage),
        chain_completed,
    })
}

/// Fetch a chain with its ordered steps and aggregates.
pub fn get_chain(conn: &Connection, chain_id: &str) -> Result<ChainDetail> {
    let chain = conn
        .query_row(
            "SELECT id, project_id, objective, status, created_at FROM thinking_chains WHERE id = ?1",
            params![chain_id],
            row_to_chain,
        )
        .optional()?
        .ok_or_else(|| Error::not_found("thinking chain", chain_id))?;

    let mut stmt = conn.prepare(
        "SELECT id, chain_id, stage, title, content, reasoning, confidence, created_at \
         FROM thinking_steps WHERE chain_id = ?1 ORDER BY seq ASC",
    )?;
    let steps = stmt
        .query_map(params![chain_id], row_to_step)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let average_confidence = if steps.is_empty() {
        0.0
    } else {
        steps.iter().map(|s| s.confidence).sum::<f64>() / steps.len() as f64
    };
    let total_tokens = steps.iter().map(|s| tokens::estimate(&s.content)).sum();

    Ok(ChainDetail {
        chain,
        steps,
        average_confidence,
        total_tokens,
    })
}

/// List a project's chains, newest-first.
pub fn list_chains(conn: &Connection, project_id: &str, limit: usize) -> Result<Vec<ThinkingChain>> {
    crate::store::ensure_project(conn, project_id)?;
    let mut stmt = conn.prepare(
        "SELECT id, project_id, objective, status, created_at FROM thinking_chains \
         WHERE project_id = ?1 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
    )?;
    let chains = stmt
        .query_map(params![project_id, limit as i64], row_to_chain)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(chains)
}

/// Explicitly abandon a chain; its steps remain readable.
pub fn abandon_chain(conn: &Connection, chain_id: &str) -> Result<ThinkingChain> {
    let rows = conn.execute(
        "UPDATE thinking_chains SET status = 'abandoned' WHERE id = ?1",
        params![chain_id],
    )?;
    if rows == 0 {
        return Err(Error::not_found("thinking chain", chain_id));
    }
    conn.query_row(
        "SELECT id, project_id, objective, status, created_at FROM thinking_chains WHERE id = ?1",
        params![chain_id],
        row_to_chain,
    )
    .map_err(Into::into)
}

fn row_to_chain(row: &Row<'_>) -> rusqlite::Result<ThinkingChain> {
    let status: String = row.get(3)?;
    Ok(ThinkingChain {
        id: row.get(0)?,
        project_id: row.get(1)?,
        objective: row.get(2)?,
        status: status.parse().unwrap_or(ChainStatus::Active),
        created_at: row.get(4)?,
    })
}

fn row_to_step(row: &Row<'_>) -> rusqlite::Result<ThinkingStep> {
    Ok(ThinkingStep {
        id: row.get(0)?,
        chain_id: row.get(1)?,
        stage: row.get(2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        reasoning: row.get(5)?,
        confidence: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
