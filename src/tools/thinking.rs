use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StartThinkingChainParams {
    pub project_id: String,

    #[schemars(description = "What this reasoning chain is trying to achieve")]
    pub objective: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddThinkingStepParams {
    pub chain_id: String,

    #[schemars(description = "Reasoning stage: 'analysis', 'planning', 'execution', 'validation', or 'reflection'. Out-of-order stages are accepted; unrecognized values restart the suggestion at 'analysis'.")]
    pub stage: String,

    pub title: String,

    #[schemars(description = "What was concluded or done in this step")]
    pub content: String,

    #[schemars(description = "Why — the reasoning behind the step. Defaults to empty.")]
    pub reasoning: Option<String>,

    #[schemars(description = "Confidence 0.0-1.0. Defaults to 0.7.")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetThinkingChainParams {
    pub chain_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListThinkingChainsParams {
    pub project_id: String,

    #[schemars(description = "Maximum results. Defaults to 10.")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AbandonThinkingChainParams {
    pub chain_id: String,
}
