use crate::config::ApiConfig;
use sqlpilot_agents::factory::create_sql_generation_agent;
use sqlpilot_agents::SqlGenerationAgent;
use sqlpilot_tools::SchemaDescription;
use std::sync::Arc;

pub fn create_agent(
    config: &ApiConfig,
    schema: Arc<SchemaDescription>,
) -> anyhow::Result<SqlGenerationAgent> {
    let template = config.prompt_template()?;
    tracing::info!(template = %template.name(), "Using prompt template");

    create_sql_generation_agent(
        &config.client_settings(),
        schema,
        template,
        config.generation_settings(),
    )
}
