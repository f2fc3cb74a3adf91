/// Tool execution error
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Schema unavailable for table '{table}': {reason}")]
    SchemaUnavailable { table: String, reason: String },
    #[error("Connection error: {0}")]
    ConnectionError(String),
    #[error("Execution error: {0}")]
    ExecutionError(String),
}

impl ToolError {
    pub fn schema_unavailable(table: impl Into<String>, reason: impl ToString) -> Self {
        ToolError::SchemaUnavailable {
            table: table.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<sqlx::Error> for ToolError {
    fn from(err: sqlx::Error) -> Self {
        ToolError::ExecutionError(err.to_string())
    }
}
