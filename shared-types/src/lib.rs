use serde::{Deserialize, Serialize};

pub mod execution;
pub mod generation;

pub use execution::{ExecuteRequest, ExecuteResponse};
pub use generation::{GenerateRequest, GenerateResponse};

// Shared models for the sqlpilot HTTP API and CLI

/// Machine-readable error category carried alongside every error message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingPrompt,
    MissingStatement,
    CompletionFailure,
    ExecutionFailure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
    pub model: String,
    pub tables: Vec<String>,
}

/// Snapshot of the schema text the model is grounded on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub tables: Vec<String>,
    pub description: String,
}
