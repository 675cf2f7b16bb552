//! Core entity definitions, matching the table schemas in [`crate::db::schema`].
//!
//! Closed enums ([`Priority`], [`TaskStatus`], [`ChainStatus`], [`SessionStatus`])
//! carry `as_str`/`FromStr` pairs for SQL round-tripping; an unparseable value is
//! an `InvalidArgument` at the operation boundary, never a silent default.
//! Memory `type` and thinking-step `stage` are open strings by design.

use serde::{Deserialize, Serialize};

/// A project — the ownership root for every other entity. Identity is
/// determined by `root_path`: looking up a path returns the existing project
/// or creates one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    pub name: String,
    pub root_path: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A stored memory record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub project_id: String,
    /// Chat session this memory was accumulated under, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Open tag: conversation, decision, convention, thinking_step, ...
    #[serde(rename = "type")]
    pub memory_type: String,
    pub title: String,
    pub content: String,
    /// Embedding vector; absent when the embedding collaborator was
    /// unavailable at write time. Not serialized into tool responses.
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
    /// Relevance weight in `[0.0, 1.0]`.
    pub importance: f64,
    pub created_at: String,
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("unknown priority: {s} (expected low|medium|high)")),
        }
    }
}

/// Task lifecycle status. Transitions are unconstrained; every transition
/// updates `updated_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!(
                "unknown task status: {s} (expected pending|in_progress|done|cancelled)"
            )),
        }
    }
}

/// A tracked work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub status: TaskStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Thinking chain lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainStatus {
    Active,
    Completed,
    Abandoned,
}

impl ChainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl std::str::FromStr for ChainStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            _ => Err(format!("unknown chain status: {s}")),
        }
    }
}

/// An ordered sequence of reasoning steps pursuing one objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkingChain {
    pub id: String,
    pub project_id: String,
    pub objective: String,
    pub status: ChainStatus,
    pub created_at: String,
}

/// One reasoning step. `stage` is stored as given so lenient stage handling
/// survives round-trips; ordering is arrival order, never stage order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkingStep {
    pub id: String,
    pub chain_id: String,
    pub stage: String,
    pub title: String,
    pub content: String,
    pub reasoning: String,
    pub confidence: f64,
    pub created_at: String,
}

/// An immutable compressed summary of some source content (usually a
/// consolidated chat session).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSummary {
    pub id: String,
    pub project_id: String,
    /// What was summarized — a session id for consolidations.
    pub source_ref: String,
    /// The compressed text itself.
    pub content: String,
    pub original_tokens: usize,
    pub compressed_tokens: usize,
    /// `compressed_tokens / original_tokens`, in `(0, 1]`.
    pub compression_ratio: f64,
    pub key_points: Vec<String>,
    pub decisions: Vec<String>,
    pub pending_actions: Vec<String>,
    pub created_at: String,
}

/// Chat session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Consolidated,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Consolidated => "consolidated",
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "consolidated" => Ok(Self::Consolidated),
            _ => Err(format!("unknown session status: {s}")),
        }
    }
}

/// A temporary aggregation scope for memories created during one conversation.
/// Transitions active → consolidated exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub objective: String,
    pub status: SessionStatus,
    /// Set once consolidated; points at the stored [`ContextSummary`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_id: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consolidated_at: Option<String>,
}
