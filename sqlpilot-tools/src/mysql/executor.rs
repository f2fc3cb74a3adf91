//! Statement classification and execution
//!
//! A candidate statement is classified by prefix only: anything starting with `SELECT` or
//! `SHOW` (case-insensitive, after leading whitespace) is a read and its rows are returned;
//! everything else is run inside a transaction that is committed immediately, and only the
//! affected row count is reported.
//!
//! Each call opens its own connection through a [`DatabaseConnector`] and closes it before
//! returning, whatever the outcome. Database failures never escape as anything other than an
//! [`ExecutionError`] of kind [`ExecutionErrorKind::ExecutionFailure`].

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::tool_error::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Read,
    Mutating,
}

/// Prefix-based read/write classification. No parsing is done, so a statement preceded by a
/// comment is classified as mutating.
pub fn classify(statement: &str) -> StatementKind {
    let trimmed = statement.trim_start();
    let is_read = ["select", "show"].iter().any(|prefix| {
        trimmed
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    });

    if is_read {
        StatementKind::Read
    } else {
        StatementKind::Mutating
    }
}

/// Rows returned by a read statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Rows {
        columns: Vec<String>,
        rows: Vec<Map<String, Value>>,
    },
    Acknowledged {
        rows_affected: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionErrorKind {
    MissingStatement,
    ExecutionFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ExecutionError {
    pub kind: ExecutionErrorKind,
    pub message: String,
}

impl ExecutionError {
    pub fn missing_statement() -> Self {
        Self {
            kind: ExecutionErrorKind::MissingStatement,
            message: "No SQL statement to execute. Generate one first.".to_string(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: ExecutionErrorKind::ExecutionFailure,
            message: message.into(),
        }
    }
}

impl From<ToolError> for ExecutionError {
    fn from(err: ToolError) -> Self {
        ExecutionError::failure(err.to_string())
    }
}

/// Opens short-lived connections to the target database
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn DatabaseConnection>, ToolError>;
}

/// A single open connection
#[async_trait]
pub trait DatabaseConnection: Send {
    /// Runs a read statement and returns every row
    async fn fetch_all(&mut self, statement: &str) -> Result<ResultSet, ToolError>;

    /// Runs a statement inside a transaction, commits it and returns the affected row count
    async fn execute_committed(&mut self, statement: &str) -> Result<u64, ToolError>;

    async fn close(&mut self) -> Result<(), ToolError>;
}

/// Executes one candidate statement.
///
/// `None`, empty and whitespace-only statements are rejected with
/// [`ExecutionErrorKind::MissingStatement`] before any connection is opened.
pub async fn execute_statement(
    connector: &dyn DatabaseConnector,
    statement: Option<&str>,
) -> Result<ExecutionOutcome, ExecutionError> {
    let statement = match statement {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Err(ExecutionError::missing_statement()),
    };

    let kind = classify(statement);
    tracing::info!(kind = ?kind, sql = %statement, "Executing statement");

    let mut conn = connector.connect().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to open database connection");
        ExecutionError::from(e)
    })?;

    let result = run(conn.as_mut(), kind, statement).await;

    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "Failed to close database connection");
    }

    match &result {
        Ok(ExecutionOutcome::Rows { rows, .. }) => {
            tracing::info!(row_count = rows.len(), "Read statement succeeded")
        }
        Ok(ExecutionOutcome::Acknowledged { rows_affected }) => {
            tracing::info!(rows_affected, "Mutating statement committed")
        }
        Err(e) => tracing::warn!(error = %e.message, "Statement failed"),
    }

    result
}

async fn run(
    conn: &mut dyn DatabaseConnection,
    kind: StatementKind,
    statement: &str,
) -> Result<ExecutionOutcome, ExecutionError> {
    match kind {
        StatementKind::Read => {
            let set = conn.fetch_all(statement).await?;
            Ok(ExecutionOutcome::Rows {
                columns: set.columns,
                rows: set.rows,
            })
        }
        StatementKind::Mutating => {
            let rows_affected = conn.execute_committed(statement).await?;
            Ok(ExecutionOutcome::Acknowledged { rows_affected })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counters {
        connects: AtomicUsize,
        closes: AtomicUsize,
    }

    struct FakeConnector {
        counters: Arc<Counters>,
        rows: Vec<Map<String, Value>>,
    }

    struct FakeConnection {
        counters: Arc<Counters>,
        rows: Vec<Map<String, Value>>,
    }

    #[async_trait]
    impl DatabaseConnector for FakeConnector {
        async fn connect(&self) -> Result<Box<dyn DatabaseConnection>, ToolError> {
            self.counters.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeConnection {
                counters: self.counters.clone(),
                rows: self.rows.clone(),
            }))
        }
    }

    #[async_trait]
    impl DatabaseConnection for FakeConnection {
        async fn fetch_all(&mut self, statement: &str) -> Result<ResultSet, ToolError> {
            if statement.contains("FORM") {
                return Err(ToolError::ExecutionError(
                    "You have an error in your SQL syntax".to_string(),
                ));
            }
            let columns = self
                .rows
                .first()
                .map(|row| row.keys().cloned().collect())
                .unwrap_or_default();
            Ok(ResultSet {
                columns,
                rows: self.rows.clone(),
            })
        }

        async fn execute_committed(&mut self, statement: &str) -> Result<u64, ToolError> {
            if statement.contains("missing_table") {
                return Err(ToolError::ExecutionError(
                    "Table 'app.missing_table' doesn't exist".to_string(),
                ));
            }
            Ok(3)
        }

        async fn close(&mut self) -> Result<(), ToolError> {
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn connector(rows: Vec<Map<String, Value>>) -> (FakeConnector, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        (
            FakeConnector {
                counters: counters.clone(),
                rows,
            },
            counters,
        )
    }

    fn row(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("SELECT 1"), StatementKind::Read);
        assert_eq!(classify("  select * from users"), StatementKind::Read);
        assert_eq!(classify("\n\tShow tables"), StatementKind::Read);
        assert_eq!(classify("SHOW TABLES"), StatementKind::Read);
        assert_eq!(
            classify("INSERT INTO users (name) VALUES ('a')"),
            StatementKind::Mutating
        );
        assert_eq!(classify("UPDATE users SET name = 'b'"), StatementKind::Mutating);
        assert_eq!(classify("DELETE FROM users"), StatementKind::Mutating);
        assert_eq!(classify("-- list\nSELECT 1"), StatementKind::Mutating);
        assert_eq!(classify("sel"), StatementKind::Mutating);
    }

    #[tokio::test]
    async fn test_missing_statement_never_connects() {
        let (connector, counters) = connector(vec![]);

        for statement in [None, Some(""), Some("   \n")] {
            let err = execute_statement(&connector, statement).await.unwrap_err();
            assert_eq!(err.kind, ExecutionErrorKind::MissingStatement);
        }

        assert_eq!(counters.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_read_with_zero_rows_has_no_columns() {
        let (connector, counters) = connector(vec![]);

        let outcome = execute_statement(&connector, Some("SELECT * FROM users WHERE 1 = 0"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ExecutionOutcome::Rows {
                columns: vec![],
                rows: vec![]
            }
        );
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_read_returns_ordered_rows() {
        let rows = vec![
            row(json!({"id": 1, "name": "Alice"})),
            row(json!({"id": 2, "name": "Bob"})),
        ];
        let (connector, _) = connector(rows.clone());

        let outcome = execute_statement(&connector, Some("select id, name from users"))
            .await
            .unwrap();

        match outcome {
            ExecutionOutcome::Rows { columns, rows: got } => {
                assert_eq!(columns, vec!["id", "name"]);
                assert_eq!(got, rows);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mutation_reports_rows_affected() {
        let (connector, counters) = connector(vec![]);

        let outcome = execute_statement(&connector, Some("UPDATE users SET active = 0"))
            .await
            .unwrap();

        assert_eq!(outcome, ExecutionOutcome::Acknowledged { rows_affected: 3 });
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_then_recovery() {
        let (connector, counters) = connector(vec![row(json!({"id": 1}))]);

        let err = execute_statement(&connector, Some("SELECT * FORM users"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ExecutionErrorKind::ExecutionFailure);
        assert!(!err.message.is_empty());

        let err = execute_statement(&connector, Some("DELETE FROM missing_table"))
            .await
            .unwrap_err();
        assert!(err.message.contains("doesn't exist"));

        let outcome = execute_statement(&connector, Some("SELECT id FROM users"))
            .await
            .unwrap();
        assert!(matches!(outcome, ExecutionOutcome::Rows { .. }));

        assert_eq!(counters.connects.load(Ordering::SeqCst), 3);
        assert_eq!(counters.closes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_connect_failure_is_execution_failure() {
        struct Unreachable;

        #[async_trait]
        impl DatabaseConnector for Unreachable {
            async fn connect(&self) -> Result<Box<dyn DatabaseConnection>, ToolError> {
                Err(ToolError::ConnectionError("Connection refused".to_string()))
            }
        }

        let err = execute_statement(&Unreachable, Some("SELECT 1"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ExecutionErrorKind::ExecutionFailure);
        assert!(err.message.contains("Connection refused"));
    }
}
