use actix_web::{post, web, HttpResponse, Responder};
use shared_types::{ErrorKind, ErrorResponse, ExecuteRequest, ExecuteResponse};
use sqlpilot_tools::{
    acknowledgment, execute_statement, DatabaseConnector, ExecutionErrorKind, ExecutionOutcome,
};
use std::sync::Arc;
use tracing::warn;

/// Runs a statement the caller has reviewed, typically one returned by `/generate`
#[post("/execute")]
pub async fn execute_sql(
    req: web::Json<ExecuteRequest>,
    connector: web::Data<Arc<dyn DatabaseConnector>>,
) -> impl Responder {
    let statement = req.into_inner().sql;

    match execute_statement(connector.get_ref().as_ref(), statement.as_deref()).await {
        Ok(outcome) => {
            let sql = statement.unwrap_or_default().trim().to_string();
            let body = match outcome {
                ExecutionOutcome::Rows { columns, rows } => ExecuteResponse::Rows {
                    sql,
                    columns,
                    row_count: rows.len(),
                    rows,
                },
                ExecutionOutcome::Acknowledged { rows_affected } => ExecuteResponse::Acknowledged {
                    sql,
                    rows_affected,
                    message: acknowledgment(rows_affected),
                },
            };
            HttpResponse::Ok().json(body)
        }
        Err(e) => match e.kind {
            ExecutionErrorKind::MissingStatement => HttpResponse::BadRequest()
                .json(ErrorResponse::new(ErrorKind::MissingStatement, e.message)),
            ExecutionErrorKind::ExecutionFailure => {
                warn!(error = %e.message, "Execution failed");
                HttpResponse::UnprocessableEntity()
                    .json(ErrorResponse::new(ErrorKind::ExecutionFailure, e.message))
            }
        },
    }
}
