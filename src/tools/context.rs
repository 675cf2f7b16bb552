//! Token and context tool parameters, plus the memory-context renderer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::types::{Memory, Project, Task};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EstimateTokensParams {
    #[schemars(description = "Text to estimate the token cost of")]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CompressContextParams {
    #[schemars(description = "Text to compress")]
    pub text: String,

    #[schemars(description = "Token budget the output must fit")]
    pub target_tokens: usize,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetMemoryContextParams {
    pub project_id: String,

    #[schemars(description = "Optional query; when given, relevant memories are ranked semantically instead of by recency")]
    pub query: Option<String>,
}

/// Render the markdown context block served to the assistant at the top of a
/// conversation: project identity, relevant memories, pending tasks, and a
/// task reminder, in that order.
pub fn render_memory_context(project: &Project, memories: &[Memory], tasks: &[Task]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "## Current Project: {} ({})\n",
        project.name, project.root_path
    ));

    if !memories.is_empty() {
        out.push_str("\n## Relevant Memories\n");
        for memory in memories {
            out.push_str(&format!("### {}: {}\n", memory.memory_type, memory.title));
            out.push_str(&format!("{}\n", preview(&memory.content, 200)));
        }
    }

    if !tasks.is_empty() {
        out.push_str("\n## Pending Tasks\n");
        for task in tasks {
            out.push_str(&format!("- [{}] {}\n", task.priority, task.title));
        }
    }

    out.push_str(
        "\n## Task Reminder\nRemember to create or update tasks for the current project as needed.\n",
    );
    out
}

fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
