use actix_web::{get, web, HttpResponse, Responder};
use shared_types::SchemaResponse;
use sqlpilot_agents::SqlGenerationAgent;
use std::sync::Arc;

/// The schema text the model is grounded on, as captured at startup
#[get("/schema")]
pub async fn get_schema(agent: web::Data<Arc<SqlGenerationAgent>>) -> impl Responder {
    let schema = agent.schema();
    HttpResponse::Ok().json(SchemaResponse {
        tables: schema.table_names(),
        description: schema.as_text().to_string(),
    })
}
