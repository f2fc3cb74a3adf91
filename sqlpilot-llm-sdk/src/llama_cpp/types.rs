use serde::{Deserialize, Serialize};

/// Llama.cpp raw completion request (OpenAI-compatible `/v1/completions`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlamaCppCompletionRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Llama.cpp raw completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlamaCppCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<LlamaCppChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<LlamaCppUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlamaCppChoice {
    #[serde(default)]
    pub index: u32,
    pub text: String,
    #[serde(rename = "finish_reason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlamaCppUsage {
    #[serde(rename = "prompt_tokens")]
    pub prompt_tokens: u32,
    #[serde(rename = "completion_tokens")]
    pub completion_tokens: u32,
    #[serde(rename = "total_tokens")]
    pub total_tokens: u32,
}
