use serde::{Deserialize, Serialize};

/// Natural-language request to turn into a single SQL statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Candidate statement returned for review; nothing has been executed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub sql: String,
    pub prompt: String,
}
