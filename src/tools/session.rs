use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StartChatSessionParams {
    pub project_id: String,

    pub title: String,

    #[schemars(description = "What this conversation is trying to achieve. Defaults to empty.")]
    pub objective: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddToSessionParams {
    pub session_id: String,

    #[schemars(description = "Content to accumulate under this session")]
    pub content: String,

    #[schemars(description = "Memory tag for the content. Defaults to 'conversation'.")]
    pub r#type: Option<String>,

    #[schemars(description = "Short title. Defaults to the leading characters of the content.")]
    pub title: Option<String>,

    #[schemars(description = "Relevance weight 0.0-1.0. Defaults to 0.5.")]
    pub importance: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConsolidateSessionParams {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetContinuationContextParams {
    pub session_id: String,
}
