use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTaskParams {
    pub project_id: String,

    pub title: String,

    #[schemars(description = "Longer description of the work. Defaults to empty.")]
    pub description: Option<String>,

    #[schemars(description = "Priority: 'low', 'medium', or 'high'. Defaults to 'medium'.")]
    pub priority: Option<String>,

    #[schemars(description = "Free-form category, e.g. 'feature', 'bug', 'chore'. Defaults to 'feature'.")]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListTasksParams {
    pub project_id: String,

    #[schemars(description = "Filter by status: 'pending', 'in_progress', 'done', or 'cancelled'")]
    pub status: Option<String>,

    #[schemars(description = "Maximum results. Defaults to 20.")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTaskStatusParams {
    pub task_id: String,

    #[schemars(description = "New status: 'pending', 'in_progress', 'done', or 'cancelled'")]
    pub status: String,
}
