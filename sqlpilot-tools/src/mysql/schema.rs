//! Schema model and its text rendering for model grounding
//!
//! The rendered text is the only thing the model ever sees of the database, so the format is
//! fixed and deterministic: tables in the order they were requested, columns in ordinal order,
//! explicit foreign keys in constraint order, then relationships inferred from `<table>_id`
//! column names.
//!
//! # Example Output
//!
//! ```text
//! Database Schema:
//!
//! Table: users
//! Columns:
//!   - id (BIGINT UNSIGNED, NOT NULL)
//!   - name (VARCHAR(255), NOT NULL)
//!
//! Table: projects
//! Columns:
//!   - id (BIGINT UNSIGNED, NOT NULL)
//!   - users_id (BIGINT UNSIGNED, NULL)
//!   - status (VARCHAR(20), NOT NULL DEFAULT active)
//! Relationships (from FK):
//!   - projects.users_id → users.id
//! Relationships (inferred):
//!   - projects.users_id → users.id
//! ```
//!
//! Inference needs the prefix to be a target table name exactly: `users_id` points at
//! `users`, while `user_id` points at nothing unless a `user` table is also described.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    /// Native column type as declared, e.g. `VARCHAR(255)`
    pub data_type: String,
    pub nullable: bool,
    /// Raw default expression, if any
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ForeignKeyRef {
    /// Declared as a constraint in the database
    Explicit {
        table: String,
        columns: Vec<String>,
        referred_table: String,
        referred_columns: Vec<String>,
    },
    /// Guessed from a `<table>_id` column name; may be wrong when the convention is violated
    Inferred {
        table: String,
        column: String,
        referred_table: String,
    },
}

impl ForeignKeyRef {
    /// Renders the relationship as `table.col → referred_table.col`
    pub fn describe(&self) -> String {
        match self {
            ForeignKeyRef::Explicit {
                table,
                columns,
                referred_table,
                referred_columns,
            } => format!(
                "{}.{} → {}.{}",
                table,
                columns.join(", "),
                referred_table,
                referred_columns.join(", ")
            ),
            ForeignKeyRef::Inferred {
                table,
                column,
                referred_table,
            } => format!("{}.{} → {}.id", table, column, referred_table),
        }
    }

    pub fn is_inferred(&self) -> bool {
        matches!(self, ForeignKeyRef::Inferred { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
    /// Explicit keys first, then inferred ones
    pub foreign_keys: Vec<ForeignKeyRef>,
}

impl TableSchema {
    pub fn explicit_keys(&self) -> impl Iterator<Item = &ForeignKeyRef> {
        self.foreign_keys.iter().filter(|fk| !fk.is_inferred())
    }

    pub fn inferred_keys(&self) -> impl Iterator<Item = &ForeignKeyRef> {
        self.foreign_keys.iter().filter(|fk| fk.is_inferred())
    }
}

/// Immutable snapshot of the target tables, built once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescription {
    tables: Vec<TableSchema>,
    text: String,
}

impl SchemaDescription {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        let text = render(&tables);
        Self { tables, text }
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    pub fn as_text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for SchemaDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Naming-convention pass: `<x>_id` where `<x>` is one of `targets` points at `<x>.id`.
///
/// Explicit keys on the same column are not consulted; both kinds are kept.
pub fn infer_relationships(
    table: &str,
    columns: &[ColumnSchema],
    targets: &[String],
) -> Vec<ForeignKeyRef> {
    columns
        .iter()
        .filter_map(|col| {
            let referred = col.name.strip_suffix("_id")?;
            targets
                .iter()
                .any(|t| t == referred)
                .then(|| ForeignKeyRef::Inferred {
                    table: table.to_string(),
                    column: col.name.clone(),
                    referred_table: referred.to_string(),
                })
        })
        .collect()
}

fn render(tables: &[TableSchema]) -> String {
    let mut out = String::from("Database Schema:\n");

    for table in tables {
        let _ = write!(out, "\nTable: {}\nColumns:\n", table.name);

        for col in &table.columns {
            let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
            let default = col
                .default
                .as_ref()
                .map(|d| format!(" DEFAULT {}", d))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  - {} ({}, {}{})",
                col.name, col.data_type, nullable, default
            );
        }

        let explicit: Vec<_> = table.explicit_keys().collect();
        if !explicit.is_empty() {
            out.push_str("Relationships (from FK):\n");
            for fk in explicit {
                let _ = writeln!(out, "  - {}", fk.describe());
            }
        }

        let inferred: Vec<_> = table.inferred_keys().collect();
        if !inferred.is_empty() {
            out.push_str("Relationships (inferred):\n");
            for fk in inferred {
                let _ = writeln!(out, "  - {}", fk.describe());
            }
        }
    }

    out.trim().to_string()
}
