//! MCP server initialization for stdio and streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that wire up the
//! database, embedding provider, and MCP tool handler into a running server.

use crate::config::MemoriaConfig;
use crate::db;
use crate::embedding;
use crate::tools::MemoriaTools;
use anyhow::Result;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::StreamableHttpService;
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

/// Shared setup: open DB, create embedding provider, check model version.
/// Returns (db, embedding, config) wrapped in Arc for sharing.
fn setup_shared_state(
    config: MemoriaConfig,
) -> Result<(
    Arc<Mutex<rusqlite::Connection>>,
    Arc<dyn embedding::EmbeddingProvider>,
    Arc<MemoriaConfig>,
)> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    // Stored vectors become incomparable when the embedding model changes.
    match db::get_meta(&conn, "embedding_model")? {
        Some(stored_model) if stored_model != config.embedding.model => {
            tracing::warn!(
                stored = %stored_model,
                configured = %config.embedding.model,
                "embedding model changed — existing vectors were built with the old model"
            );
            db::set_meta(&conn, "embedding_model", &config.embedding.model)?;
        }
        Some(_) => {}
        None => db::set_meta(&conn, "embedding_model", &config.embedding.model)?,
    }

    let db = Arc::new(Mutex::new(conn));

    let provider = embedding::create_provider(&config.embedding)?;
    let embedding: Arc<dyn embedding::EmbeddingProvider> = Arc::from(provider);
    tracing::info!(provider = %config.embedding.provider, "embedding provider ready");

    let config = Arc::new(config);

    Ok((db, embedding, config))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: MemoriaConfig) -> Result<()> {
    tracing::info!("starting memoria MCP server on stdio");

    let (db, embedding, config) = setup_shared_state(config)?;

    let tools = MemoriaTools::new(db, embedding, config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running — waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP transport. Each HTTP session
/// gets its own [`MemoriaTools`] clone over the shared state.
pub async fn serve_http(config: MemoriaConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let (db, embedding, config) = setup_shared_state(config)?;

    let service = StreamableHttpService::new(
        move || Ok(MemoriaTools::new(db.clone(), embedding.clone(), config.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let app = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP endpoint at http://{bind_addr}/mcp");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down HTTP server");
}
