pub mod mysql;
pub mod tool_error;

pub use mysql::executor::{
    classify, execute_statement, DatabaseConnection, DatabaseConnector, ExecutionError,
    ExecutionErrorKind, ExecutionOutcome, ResultSet, StatementKind,
};
pub use mysql::introspect::{describe, SchemaSource};
pub use mysql::schema::{ColumnSchema, ForeignKeyRef, SchemaDescription, TableSchema};
pub use mysql::formatter::{acknowledgment, format_outcome};
pub use mysql::{MySqlConnector, MySqlSchemaSource, MySqlSettings};
pub use tool_error::ToolError;
