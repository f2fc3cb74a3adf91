use actix_web::{get, web, HttpResponse, Responder};
use shared_types::HealthResponse;
use sqlpilot_agents::SqlGenerationAgent;
use std::sync::Arc;

#[get("/health")]
pub async fn health(agent: web::Data<Arc<SqlGenerationAgent>>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        provider: agent.provider_name().to_string(),
        model: agent.model_name().to_string(),
        tables: agent.schema().table_names(),
    })
}
