pub mod execute;
pub mod generate;
pub mod health;
pub mod schema;

use actix_web::web;

/// Registers every route served by the API
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate::generate_sql)
        .service(execute::execute_sql)
        .service(health::health)
        .service(schema::get_schema);
}
