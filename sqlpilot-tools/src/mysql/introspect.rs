use async_trait::async_trait;

use super::schema::{infer_relationships, ColumnSchema, ForeignKeyRef, SchemaDescription, TableSchema};
use crate::tool_error::ToolError;

/// Source of table metadata for [`describe`]
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Columns of `table` in ordinal order; empty when the table does not exist
    async fn columns(&self, table: &str) -> Result<Vec<ColumnSchema>, ToolError>;

    /// Declared foreign keys of `table`, one entry per constraint
    async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyRef>, ToolError>;
}

/// Builds the schema description for `tables`, in the order given.
///
/// Fails as a whole if any table is missing or its metadata cannot be read.
pub async fn describe(
    source: &dyn SchemaSource,
    tables: &[String],
) -> Result<SchemaDescription, ToolError> {
    let mut described = Vec::with_capacity(tables.len());

    for table in tables {
        let columns = source.columns(table).await.map_err(|e| match e {
            ToolError::SchemaUnavailable { .. } => e,
            other => ToolError::schema_unavailable(table, other.to_string()),
        })?;

        if columns.is_empty() {
            return Err(ToolError::schema_unavailable(
                table,
                "table does not exist or has no visible columns",
            ));
        }

        let mut foreign_keys = source.foreign_keys(table).await.map_err(|e| match e {
            ToolError::SchemaUnavailable { .. } => e,
            other => ToolError::schema_unavailable(table, other.to_string()),
        })?;
        let explicit = foreign_keys.len();
        foreign_keys.extend(infer_relationships(table, &columns, tables));

        tracing::info!(
            table = %table,
            columns = columns.len(),
            explicit_keys = explicit,
            inferred_keys = foreign_keys.len() - explicit,
            "Described table"
        );

        described.push(TableSchema {
            name: table.clone(),
            columns,
            foreign_keys,
        });
    }

    Ok(SchemaDescription::new(described))
}
