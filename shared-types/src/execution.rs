use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Statement the caller approved for execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default, alias = "generated_sql")]
    pub sql: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecuteResponse {
    /// Result of a read statement (SELECT / SHOW)
    Rows {
        sql: String,
        columns: Vec<String>,
        rows: Vec<Map<String, Value>>,
        row_count: usize,
    },
    /// A mutating statement ran and was committed
    Acknowledged {
        sql: String,
        rows_affected: u64,
        message: String,
    },
}
