//! Persistent project memory for AI coding assistants, served over MCP.
//!
//! memoria is an [MCP](https://modelcontextprotocol.io/) server that gives a
//! coding assistant durable, structured memory across conversations. Each
//! project (keyed by its filesystem root) owns:
//!
//! - **Memories** — typed, importance-weighted notes with optional embedding
//!   vectors for semantic recall
//! - **Tasks** — prioritized work items with a simple status lifecycle
//! - **Thinking chains** — staged reasoning records (analysis → planning →
//!   execution → validation → reflection)
//! - **Chat sessions** — aggregation scopes whose contents consolidate into a
//!   single compressed summary for handoff to the next conversation
//!
//! # Architecture
//!
//! - **Storage**: SQLite (bundled, WAL mode) behind a single shared connection
//! - **Embeddings**: optional remote HTTP provider; every feature degrades
//!   gracefully when it is unavailable
//! - **Compression**: token-budgeted extractive summarization that keeps
//!   decisions and pending actions over ordinary prose
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite initialization, schema, and metadata
//! - [`store`] — Projects, memories, tasks, and statistics
//! - [`thinking`] — The staged reasoning engine
//! - [`session`] — Chat sessions and consolidation
//! - [`compress`] — Token estimation and context compression

pub mod compress;
pub mod config;
pub mod db;
pub mod embedding;
pub mod error;
pub mod search;
pub mod session;
pub mod store;
pub mod thinking;
pub mod tokens;
