//! Terminal commands that run against the database directly, without a server.

use anyhow::Result;

use crate::config::MemoriaConfig;

/// Display database statistics in the terminal.
pub fn stats(config: &MemoriaConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let report = crate::store::stats::database_stats(&conn, Some(&db_path))?;

    println!("Memoria Statistics");
    println!("{}", "=".repeat(40));
    println!("  Projects:            {}", report.projects);
    println!("  Memories:            {}", report.memories);
    println!("  Tasks:               {}", report.tasks);
    println!("  Thinking chains:     {}", report.thinking_chains);
    println!("  Thinking steps:      {}", report.thinking_steps);
    println!("  Chat sessions:       {}", report.chat_sessions);
    println!("  Context summaries:   {}", report.context_summaries);
    println!();

    if let Some(size) = report.db_size_bytes {
        println!("Database size:         {size} bytes");
    }
    println!("Database path:         {}", db_path.display());
    println!("Generated at:          {}", report.generated_at);

    Ok(())
}
