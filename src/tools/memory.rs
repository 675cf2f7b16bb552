use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateOrGetProjectParams {
    #[schemars(description = "Root path of the project. Path identity is stable: the same path always returns the same project.")]
    pub path: String,

    #[schemars(description = "Optional display name. Defaults to the path's final component. Ignored if the project already exists.")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddMemoryParams {
    #[schemars(description = "Project this memory belongs to")]
    pub project_id: String,

    #[schemars(description = "Memory tag, e.g. 'conversation', 'decision', 'convention'")]
    pub r#type: String,

    #[schemars(description = "Short title for the memory")]
    pub title: String,

    #[schemars(description = "The full content of the memory")]
    pub content: String,

    #[schemars(description = "Relevance weight 0.0-1.0. Defaults to 0.5.")]
    pub importance: Option<f64>,

    #[schemars(description = "Chat session to tag this memory with, if any")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct QueryMemoriesParams {
    pub project_id: String,

    #[schemars(description = "Filter by memory type")]
    pub r#type: Option<String>,

    #[schemars(description = "Filter by chat session")]
    pub session_id: Option<String>,

    #[schemars(description = "Maximum results. Defaults to 20.")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindSimilarMemoriesParams {
    pub project_id: String,

    #[schemars(description = "Natural language query to rank memories against")]
    pub query: String,

    #[schemars(description = "Similarity floor 0.0-1.0. Defaults to the configured threshold (0.7).")]
    pub threshold: Option<f64>,

    #[schemars(description = "Maximum results. Defaults to 10.")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetDatabaseStatsParams {
    #[schemars(description = "Restrict counts to one project; omit for database-wide stats")]
    pub project_id: Option<String>,
}
