use crate::config::ApiConfig;
use anyhow::Context;
use sqlpilot_tools::{describe, DatabaseConnector, MySqlConnector, MySqlSchemaSource, SchemaDescription};
use std::sync::Arc;

/// Introspects the configured tables once. Any failure here is fatal to startup.
pub async fn load_schema(config: &ApiConfig) -> anyhow::Result<SchemaDescription> {
    let settings = config.mysql_settings();
    let tables = config.tables();

    tracing::info!(
        host = %settings.host,
        database = %settings.database,
        tables = ?tables,
        "Loading database schema"
    );

    let source = MySqlSchemaSource::connect(&settings)
        .await
        .context("Schema introspection could not reach the database")?;
    let result = describe(&source, &tables).await;
    source.close().await;

    let schema = result.context("Schema introspection failed")?;
    tracing::info!(tables = tables.len(), "Schema loaded");

    Ok(schema)
}

pub fn create_connector(config: &ApiConfig) -> Arc<dyn DatabaseConnector> {
    Arc::new(MySqlConnector::new(&config.mysql_settings()))
}
