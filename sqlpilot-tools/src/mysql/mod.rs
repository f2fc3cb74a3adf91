//! MySQL backend: schema introspection and statement execution over sqlx
//!
//! Introspection reads `information_schema` for the current database through a single-connection
//! pool. Execution opens a fresh connection per statement and runs it as an unnamed prepared
//! statement, so the server rejects input carrying more than one statement.

pub mod executor;
pub mod formatter;
pub mod introspect;
pub mod schema;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Connection, Row, TypeInfo};
use std::time::Duration;

use crate::tool_error::ToolError;
use executor::{DatabaseConnection, DatabaseConnector, ResultSet};
use introspect::SchemaSource;
use schema::{ColumnSchema, ForeignKeyRef};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection target for the one MySQL schema the service works against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MySqlSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
}

impl MySqlSettings {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}

/// Opens one MySQL connection per call
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    options: MySqlConnectOptions,
}

impl MySqlConnector {
    pub fn new(settings: &MySqlSettings) -> Self {
        Self {
            options: settings.connect_options(),
        }
    }
}

#[async_trait]
impl DatabaseConnector for MySqlConnector {
    async fn connect(&self) -> Result<Box<dyn DatabaseConnection>, ToolError> {
        let conn = tokio::time::timeout(CONNECT_TIMEOUT, MySqlConnection::connect_with(&self.options))
            .await
            .map_err(|_| ToolError::ConnectionError("Timed out connecting to MySQL".to_string()))?
            .map_err(|e| ToolError::ConnectionError(e.to_string()))?;

        Ok(Box::new(MySqlSession { conn: Some(conn) }))
    }
}

struct MySqlSession {
    conn: Option<MySqlConnection>,
}

impl MySqlSession {
    fn conn(&mut self) -> Result<&mut MySqlConnection, ToolError> {
        self.conn
            .as_mut()
            .ok_or_else(|| ToolError::ConnectionError("Connection already closed".to_string()))
    }
}

#[async_trait]
impl DatabaseConnection for MySqlSession {
    async fn fetch_all(&mut self, statement: &str) -> Result<ResultSet, ToolError> {
        let conn = self.conn()?;
        let rows: Vec<MySqlRow> = sqlx::query(statement)
            .persistent(false)
            .fetch_all(&mut *conn)
            .await?;

        let keys = rows
            .first()
            .map(|row| {
                let names: Vec<&str> = row.columns().iter().map(|c| c.name()).collect();
                unique_keys(&names)
            })
            .unwrap_or_default();
        let rows: Vec<Map<String, Value>> = rows.iter().map(|row| row_to_map(row, &keys)).collect();
        let columns = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();

        Ok(ResultSet { columns, rows })
    }

    async fn execute_committed(&mut self, statement: &str) -> Result<u64, ToolError> {
        let conn = self.conn()?;
        let mut tx = conn.begin().await?;
        let result = sqlx::query(statement)
            .persistent(false)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn close(&mut self) -> Result<(), ToolError> {
        if let Some(conn) = self.conn.take() {
            conn.close().await?;
        }
        Ok(())
    }
}

/// Map keys for a result's columns. A repeated name, as in `SELECT u.id, p.id`, gets a
/// positional suffix (`id_2`, `id_3`, ...) that does not collide with any other column.
fn unique_keys(names: &[&str]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(names.len());

    for name in names {
        let mut key = name.to_string();
        let mut n = 2;
        while keys.contains(&key) || (key != *name && names.contains(&key.as_str())) {
            key = format!("{}_{}", name, n);
            n += 1;
        }
        keys.push(key);
    }

    keys
}

fn row_to_map(row: &MySqlRow, keys: &[String]) -> Map<String, Value> {
    row.columns()
        .iter()
        .zip(keys)
        .enumerate()
        .map(|(i, (column, key))| {
            (
                key.clone(),
                extract_value(row, i, column.type_info().name()),
            )
        })
        .collect()
}

/// Converts one cell to JSON. Dates and times become their ISO text; DECIMAL and the string
/// types keep the server's textual representation.
fn extract_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    let value = match type_name {
        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Number(v.into())),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row
            .try_get::<Option<u64>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Number(v.into())),
        "FLOAT" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .and_then(|v| serde_json::Number::from_f64(v as f64))
            .map(Value::Number),
        "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_string())),
        "DATETIME" | "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_string())),
        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_string())),
        "YEAR" => row
            .try_get_unchecked::<Option<u64>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Number(v.into())),
        "JSON" => row
            .try_get_unchecked::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(|s| serde_json::from_str(&s).unwrap_or(Value::String(s))),
        _ => None,
    };

    value.unwrap_or_else(|| text_value(row, index))
}

fn text_value(row: &MySqlRow, index: usize) -> Value {
    match row.try_get_unchecked::<Option<String>, _>(index) {
        Ok(Some(s)) => Value::String(s),
        Ok(None) => Value::Null,
        Err(_) => row
            .try_get_unchecked::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            .unwrap_or(Value::Null),
    }
}

const COLUMNS_QUERY: &str = r#"
SELECT CAST(COLUMN_NAME AS CHAR) AS column_name,
       CAST(COLUMN_TYPE AS CHAR) AS column_type,
       CAST(IS_NULLABLE AS CHAR) AS is_nullable,
       CAST(COLUMN_DEFAULT AS CHAR) AS column_default
FROM information_schema.COLUMNS
WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
ORDER BY ORDINAL_POSITION
"#;

const FOREIGN_KEYS_QUERY: &str = r#"
SELECT CAST(CONSTRAINT_NAME AS CHAR) AS constraint_name,
       CAST(COLUMN_NAME AS CHAR) AS column_name,
       CAST(REFERENCED_TABLE_NAME AS CHAR) AS referred_table,
       CAST(REFERENCED_COLUMN_NAME AS CHAR) AS referred_column
FROM information_schema.KEY_COLUMN_USAGE
WHERE TABLE_SCHEMA = DATABASE()
  AND TABLE_NAME = ?
  AND REFERENCED_TABLE_NAME IS NOT NULL
ORDER BY CONSTRAINT_NAME, ORDINAL_POSITION
"#;

#[derive(Debug, sqlx::FromRow)]
struct ColumnRow {
    column_name: String,
    column_type: String,
    is_nullable: String,
    column_default: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct KeyColumnRow {
    constraint_name: String,
    column_name: String,
    referred_table: String,
    referred_column: String,
}

/// `information_schema` reader for the configured database
pub struct MySqlSchemaSource {
    pool: MySqlPool,
}

impl MySqlSchemaSource {
    pub async fn connect(settings: &MySqlSettings) -> Result<Self, ToolError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(CONNECT_TIMEOUT)
            .connect_with(settings.connect_options())
            .await
            .map_err(|e| {
                ToolError::ConnectionError(format!("Failed to connect to MySQL: {}", e))
            })?;

        tracing::debug!(host = %settings.host, database = %settings.database, "Connected for introspection");

        Ok(Self { pool })
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SchemaSource for MySqlSchemaSource {
    async fn columns(&self, table: &str) -> Result<Vec<ColumnSchema>, ToolError> {
        let rows: Vec<ColumnRow> = sqlx::query_as(COLUMNS_QUERY)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ToolError::schema_unavailable(table, e))?;

        Ok(rows
            .into_iter()
            .map(|row| ColumnSchema {
                name: row.column_name,
                data_type: normalize_type(&row.column_type),
                nullable: row.is_nullable.eq_ignore_ascii_case("YES"),
                default: row.column_default,
            })
            .collect())
    }

    async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyRef>, ToolError> {
        let rows: Vec<KeyColumnRow> = sqlx::query_as(FOREIGN_KEYS_QUERY)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ToolError::schema_unavailable(table, e))?;

        Ok(group_key_columns(table, rows))
    }
}

/// Folds per-column key rows into one reference per constraint
fn group_key_columns(table: &str, rows: Vec<KeyColumnRow>) -> Vec<ForeignKeyRef> {
    let mut grouped: Vec<(String, ForeignKeyRef)> = Vec::new();

    for row in rows {
        match grouped.last_mut() {
            Some((
                name,
                ForeignKeyRef::Explicit {
                    columns,
                    referred_columns,
                    ..
                },
            )) if *name == row.constraint_name => {
                columns.push(row.column_name);
                referred_columns.push(row.referred_column);
            }
            _ => grouped.push((
                row.constraint_name,
                ForeignKeyRef::Explicit {
                    table: table.to_string(),
                    columns: vec![row.column_name],
                    referred_table: row.referred_table,
                    referred_columns: vec![row.referred_column],
                },
            )),
        }
    }

    grouped.into_iter().map(|(_, fk)| fk).collect()
}

/// Upper-cases the type keywords of a `COLUMN_TYPE` value, leaving anything inside parentheses
/// (enum members, lengths) untouched: `varchar(255)` becomes `VARCHAR(255)`.
fn normalize_type(column_type: &str) -> String {
    let mut depth = 0usize;
    column_type
        .chars()
        .map(|c| match c {
            '(' => {
                depth += 1;
                c
            }
            ')' => {
                depth = depth.saturating_sub(1);
                c
            }
            _ if depth == 0 => c.to_ascii_uppercase(),
            _ => c,
        })
        .collect()
}
