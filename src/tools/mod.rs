//! MCP tool handler.
//!
//! [`MemoriaTools`] holds the shared state (database connection, embedding
//! provider, config) and exposes every public operation as an MCP tool via
//! the `#[tool_router]` macro. Database work and embedding calls are
//! synchronous, so each runs under `tokio::task::spawn_blocking`.
//!
//! Embedding failure is absorbed here: a memory is stored without a vector
//! and semantic search returns empty results instead of erroring.

pub mod context;
pub mod memory;
pub mod session;
pub mod tasks;
pub mod thinking;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::config::MemoriaConfig;
use crate::embedding::EmbeddingProvider;
use crate::store::memories::MemoryFilter;
use crate::{compress, search, store, tokens};

use context::{CompressContextParams, EstimateTokensParams, GetMemoryContextParams};
use memory::{
    AddMemoryParams, CreateOrGetProjectParams, FindSimilarMemoriesParams, GetDatabaseStatsParams,
    QueryMemoriesParams,
};
use session::{
    AddToSessionParams, ConsolidateSessionParams, GetContinuationContextParams,
    StartChatSessionParams,
};
use tasks::{CreateTaskParams, ListTasksParams, UpdateTaskStatusParams};
use thinking::{
    AbandonThinkingChainParams, AddThinkingStepParams, GetThinkingChainParams,
    ListThinkingChainsParams, StartThinkingChainParams,
};

/// The memoria MCP tool handler.
#[derive(Clone)]
pub struct MemoriaTools {
    tool_router: ToolRouter<Self>,
    db: Arc<Mutex<Connection>>,
    embedding: Arc<dyn EmbeddingProvider>,
    config: Arc<MemoriaConfig>,
}

impl MemoriaTools {
    /// Run a store operation on the blocking pool under the connection mutex.
    async fn with_db<T, F>(&self, f: F) -> Result<T, String>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> crate::error::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut conn = db.lock().map_err(|e| format!("db lock poisoned: {e}"))?;
            f(&mut conn).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| format!("db task failed: {e}"))?
    }

    /// Embed text, absorbing provider failure into `None`.
    async fn try_embed(&self, text: String) -> Option<Vec<f32>> {
        let provider = Arc::clone(&self.embedding);
        match tokio::task::spawn_blocking(move || provider.embed(&text)).await {
            Ok(Ok(vector)) => Some(vector),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "embedding unavailable, continuing without vector");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "embedding task failed");
                None
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("serialization failed: {e}"))
}

#[tool_router]
impl MemoriaTools {
    pub fn new(
        db: Arc<Mutex<Connection>>,
        embedding: Arc<dyn EmbeddingProvider>,
        config: Arc<MemoriaConfig>,
    ) -> Self {
        Self {
            tool_router: Self::tool_router(),
            db,
            embedding,
            config,
        }
    }

    #[tool(description = "Look up a project by root path, creating it on first use. The same path always returns the same project.")]
    async fn create_or_get_project(
        &self,
        Parameters(params): Parameters<CreateOrGetProjectParams>,
    ) -> Result<String, String> {
        let project = self
            .with_db(move |conn| {
                store::projects::create_or_get(conn, &params.path, params.name.as_deref())
            })
            .await?;
        to_json(&project)
    }

    #[tool(description = "Store a memory for a project. Types are free-form tags: 'conversation', 'decision', 'convention', etc.")]
    async fn add_memory(
        &self,
        Parameters(params): Parameters<AddMemoryParams>,
    ) -> Result<String, String> {
        let importance = params.importance.unwrap_or(0.5);
        let embedding = self.try_embed(params.content.clone()).await;
        let embedded = embedding.is_some();

        let memory = self
            .with_db(move |conn| {
                store::memories::add_memory(
                    conn,
                    &params.project_id,
                    &params.r#type,
                    &params.title,
                    &params.content,
                    importance,
                    embedding.as_deref(),
                    params.session_id.as_deref(),
                )
            })
            .await?;

        tracing::info!(id = %memory.id, embedded, "memory stored");
        to_json(&serde_json::json!({ "memory": memory, "embedded": embedded }))
    }

    #[tool(description = "List a project's memories newest-first, optionally filtered by type or session.")]
    async fn query_memories(
        &self,
        Parameters(params): Parameters<QueryMemoriesParams>,
    ) -> Result<String, String> {
        let limit = params.limit.unwrap_or(20);
        let memories = self
            .with_db(move |conn| {
                let filter = MemoryFilter {
                    memory_type: params.r#type.clone(),
                    session_id: params.session_id.clone(),
                };
                store::memories::query_memories(conn, &params.project_id, &filter, limit)
            })
            .await?;
        to_json(&serde_json::json!({ "total": memories.len(), "memories": memories }))
    }

    #[tool(description = "Rank a project's memories against a natural language query by embedding similarity. Degrades to an empty result when the embedding service is unavailable.")]
    async fn find_similar_memories(
        &self,
        Parameters(params): Parameters<FindSimilarMemoriesParams>,
    ) -> Result<String, String> {
        let threshold = params
            .threshold
            .unwrap_or(self.config.compression.similarity_threshold);
        let limit = params.limit.unwrap_or(10);
        let candidate_limit = self.config.compression.candidate_limit;

        let Some(query_embedding) = self.try_embed(params.query.clone()).await else {
            return to_json(&serde_json::json!({
                "total": 0,
                "memories": [],
                "semantic": false,
            }));
        };

        let results = self
            .with_db(move |conn| {
                let candidates = store::memories::query_memories(
                    conn,
                    &params.project_id,
                    &MemoryFilter::default(),
                    candidate_limit,
                )?;
                Ok(search::find_similar(
                    &query_embedding,
                    candidates,
                    threshold,
                    limit,
                ))
            })
            .await?;
        to_json(&serde_json::json!({
            "total": results.len(),
            "memories": results,
            "semantic": true,
        }))
    }

    #[tool(description = "Create a task for a project. Priority: 'low', 'medium', 'high'.")]
    async fn create_task(
        &self,
        Parameters(params): Parameters<CreateTaskParams>,
    ) -> Result<String, String> {
        let task = self
            .with_db(move |conn| {
                store::tasks::add_task(
                    conn,
                    &params.project_id,
                    &params.title,
                    params.description.as_deref().unwrap_or(""),
                    params.priority.as_deref().unwrap_or("medium"),
                    params.category.as_deref().unwrap_or("feature"),
                )
            })
            .await?;
        to_json(&task)
    }

    #[tool(description = "List a project's tasks newest-first, optionally filtered by status.")]
    async fn list_tasks(
        &self,
        Parameters(params): Parameters<ListTasksParams>,
    ) -> Result<String, String> {
        let limit = params.limit.unwrap_or(20);
        let tasks = self
            .with_db(move |conn| {
                store::tasks::list_tasks(conn, &params.project_id, params.status.as_deref(), limit)
            })
            .await?;
        to_json(&serde_json::json!({ "total": tasks.len(), "tasks": tasks }))
    }

    #[tool(description = "Move a task to a new status. Any transition is allowed; each stamps updated_at.")]
    async fn update_task_status(
        &self,
        Parameters(params): Parameters<UpdateTaskStatusParams>,
    ) -> Result<String, String> {
        let task = self
            .with_db(move |conn| {
                store::tasks::update_task_status(conn, &params.task_id, &params.status)
            })
            .await?;
        to_json(&task)
    }

    #[tool(description = "Entity counts: per-project when project_id is given, database-wide otherwise.")]
    async fn get_database_stats(
        &self,
        Parameters(params): Parameters<GetDatabaseStatsParams>,
    ) -> Result<String, String> {
        let db_path = self.config.resolved_db_path();
        match params.project_id {
            Some(project_id) => {
                let stats = self
                    .with_db(move |conn| store::stats::project_stats(conn, &project_id))
                    .await?;
                to_json(&stats)
            }
            None => {
                let stats = self
                    .with_db(move |conn| store::stats::database_stats(conn, Some(db_path.as_path())))
                    .await?;
                to_json(&stats)
            }
        }
    }

    #[tool(description = "Begin a structured reasoning chain. Stages run analysis → planning → execution → validation → reflection.")]
    async fn start_thinking_chain(
        &self,
        Parameters(params): Parameters<StartThinkingChainParams>,
    ) -> Result<String, String> {
        let chain = self
            .with_db(move |conn| {
                crate::thinking::create_chain(conn, &params.project_id, &params.objective)
            })
            .await?;
        to_json(&serde_json::json!({
            "chain": chain,
            "current_stage": "analysis",
        }))
    }

    #[tool(description = "Append a reasoning step to a chain. Returns the suggested next stage (null after reflection). A reflection step completes the chain.")]
    async fn add_thinking_step(
        &self,
        Parameters(params): Parameters<AddThinkingStepParams>,
    ) -> Result<String, String> {
        let confidence = params.confidence.unwrap_or(0.7);
        let outcome = self
            .with_db(move |conn| {
                crate::thinking::add_step(
                    conn,
                    &params.chain_id,
                    &params.stage,
                    &params.title,
                    &params.content,
                    params.reasoning.as_deref().unwrap_or(""),
                    confidence,
                )
            })
            .await?;
        to_json(&outcome)
    }

    #[tool(description = "Fetch a reasoning chain with its ordered steps, mean confidence, and total token estimate.")]
    async fn get_thinking_chain(
        &self,
        Parameters(params): Parameters<GetThinkingChainParams>,
    ) -> Result<String, String> {
        let detail = self
            .with_db(move |conn| crate::thinking::get_chain(conn, &params.chain_id))
            .await?;
        to_json(&detail)
    }

    #[tool(description = "List a project's reasoning chains, newest-first.")]
    async fn list_thinking_chains(
        &self,
        Parameters(params): Parameters<ListThinkingChainsParams>,
    ) -> Result<String, String> {
        let limit = params.limit.unwrap_or(10);
        let chains = self
            .with_db(move |conn| crate::thinking::list_chains(conn, &params.project_id, limit))
            .await?;
        to_json(&serde_json::json!({ "total": chains.len(), "chains": chains }))
    }

    #[tool(description = "Explicitly abandon a reasoning chain. Its steps remain readable.")]
    async fn abandon_thinking_chain(
        &self,
        Parameters(params): Parameters<AbandonThinkingChainParams>,
    ) -> Result<String, String> {
        let chain = self
            .with_db(move |conn| crate::thinking::abandon_chain(conn, &params.chain_id))
            .await?;
        to_json(&chain)
    }

    #[tool(description = "Start a chat session — an aggregation scope for memories that will be consolidated into one summary.")]
    async fn start_chat_session(
        &self,
        Parameters(params): Parameters<StartChatSessionParams>,
    ) -> Result<String, String> {
        let session = self
            .with_db(move |conn| {
                crate::session::create_session(
                    conn,
                    &params.project_id,
                    &params.title,
                    params.objective.as_deref().unwrap_or(""),
                )
            })
            .await?;
        to_json(&session)
    }

    #[tool(description = "Accumulate content under an active session. The content is also stored as an ordinary memory tagged with the session.")]
    async fn add_to_session(
        &self,
        Parameters(params): Parameters<AddToSessionParams>,
    ) -> Result<String, String> {
        let importance = params.importance.unwrap_or(0.5);
        let title = params
            .title
            .clone()
            .unwrap_or_else(|| title_from_content(&params.content));
        let embedding = self.try_embed(params.content.clone()).await;

        let memory = self
            .with_db(move |conn| {
                crate::session::add_to_session(
                    conn,
                    &params.session_id,
                    &title,
                    &params.content,
                    params.r#type.as_deref().unwrap_or("conversation"),
                    importance,
                    embedding.as_deref(),
                )
            })
            .await?;
        to_json(&memory)
    }

    #[tool(description = "Consolidate a session into one compressed summary. Idempotent: a consolidated session returns its stored summary.")]
    async fn consolidate_session(
        &self,
        Parameters(params): Parameters<ConsolidateSessionParams>,
    ) -> Result<String, String> {
        let target_tokens = self.config.compression.default_target_tokens;
        let summary = self
            .with_db(move |conn| {
                crate::session::consolidate(conn, &params.session_id, target_tokens)
            })
            .await?;
        to_json(&summary)
    }

    #[tool(description = "Render the continuation text for a successor session: project, decisions, pending actions, reminder. Consolidates on demand.")]
    async fn get_continuation_context(
        &self,
        Parameters(params): Parameters<GetContinuationContextParams>,
    ) -> Result<String, String> {
        let target_tokens = self.config.compression.default_target_tokens;
        self.with_db(move |conn| {
            crate::session::continuation_context(conn, &params.session_id, target_tokens)
        })
        .await
    }

    #[tool(description = "Render the current memory context for a project: relevant memories, pending tasks, and a task reminder.")]
    async fn get_memory_context(
        &self,
        Parameters(params): Parameters<GetMemoryContextParams>,
    ) -> Result<String, String> {
        let max_memories = self.config.compression.context_max_memories;
        let max_tasks = self.config.compression.context_max_tasks;
        let threshold = self.config.compression.similarity_threshold;
        let candidate_limit = self.config.compression.candidate_limit;

        let query_embedding = match &params.query {
            Some(query) if !query.is_empty() => self.try_embed(query.clone()).await,
            _ => None,
        };

        self.with_db(move |conn| {
            let project = store::projects::get(conn, &params.project_id)?;

            // Semantic ranking when a query vector is available; recency
            // otherwise.
            let memories = match query_embedding {
                Some(embedding) => {
                    let candidates = store::memories::query_memories(
                        conn,
                        &project.id,
                        &MemoryFilter::default(),
                        candidate_limit,
                    )?;
                    search::find_similar(&embedding, candidates, threshold, max_memories)
                        .into_iter()
                        .map(|r| r.memory)
                        .collect()
                }
                None => store::memories::query_memories(
                    conn,
                    &project.id,
                    &MemoryFilter::default(),
                    max_memories,
                )?,
            };

            let tasks = store::tasks::list_tasks(conn, &project.id, Some("pending"), max_tasks)?;

            Ok(context::render_memory_context(&project, &memories, &tasks))
        })
        .await
    }

    #[tool(description = "Estimate the token cost of text (about one token per four characters).")]
    async fn estimate_tokens(
        &self,
        Parameters(params): Parameters<EstimateTokensParams>,
    ) -> Result<String, String> {
        to_json(&serde_json::json!({
            "estimated_tokens": tokens::estimate(&params.text),
            "characters": params.text.chars().count(),
        }))
    }

    #[tool(description = "Compress text to fit a token budget, preferring decisions, pending actions, and key points over ordinary content.")]
    async fn compress_context(
        &self,
        Parameters(params): Parameters<CompressContextParams>,
    ) -> Result<String, String> {
        let result = compress::compress(&params.text, params.target_tokens);
        to_json(&result)
    }
}

fn title_from_content(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    let title: String = first_line.chars().take(60).collect();
    if title.is_empty() {
        "Session note".to_string()
    } else {
        title
    }
}

#[tool_handler]
impl ServerHandler for MemoriaTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "memoria is a persistent project-memory server. Use add_memory and \
                 query_memories for knowledge, create_task for work items, \
                 start_thinking_chain/add_thinking_step for structured reasoning, and \
                 chat sessions with consolidate_session to hand context off between \
                 conversations."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_content_uses_first_line() {
        assert_eq!(title_from_content("hello world\nsecond"), "hello world");
        assert_eq!(title_from_content(""), "Session note");
        assert_eq!(title_from_content(&"x".repeat(100)).chars().count(), 60);
    }
}
