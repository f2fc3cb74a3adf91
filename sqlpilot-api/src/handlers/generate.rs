use actix_web::{post, web, HttpResponse, Responder};
use shared_types::{ErrorKind, ErrorResponse, GenerateRequest, GenerateResponse};
use sqlpilot_agents::{GenerationError, SqlGenerationAgent};
use std::sync::Arc;
use tracing::{error, info};

/// Produces a candidate statement for review. Nothing is executed here.
#[post("/generate")]
pub async fn generate_sql(
    req: web::Json<GenerateRequest>,
    agent: web::Data<Arc<SqlGenerationAgent>>,
) -> impl Responder {
    let prompt = req.into_inner().prompt.unwrap_or_default();

    if prompt.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            ErrorKind::MissingPrompt,
            "No prompt provided. Describe the query you need.",
        ));
    }

    info!(prompt = %prompt, "Generating SQL");

    match agent.generate(&prompt).await {
        Ok(generated) => HttpResponse::Ok().json(GenerateResponse {
            sql: generated.sql,
            prompt,
        }),
        Err(GenerationError::EmptyPrompt) => HttpResponse::BadRequest().json(
            ErrorResponse::new(ErrorKind::MissingPrompt, GenerationError::EmptyPrompt.to_string()),
        ),
        Err(e) => {
            error!(error = %e, "SQL generation failed");
            HttpResponse::BadGateway().json(ErrorResponse::new(
                ErrorKind::CompletionFailure,
                format!("SQL generation failed: {}", e),
            ))
        }
    }
}
