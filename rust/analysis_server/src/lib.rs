// src/lib.rs

pub mod handlers;
pub mod models;
pub mod prompt;
pub mod service;

use actix_cors::Cors;
use actix_web::{error::JsonPayloadError, middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use models::ErrorResponse;
use service::AnalysisService;

/// Malformed bodies (missing `stocks`, not an array, invalid JSON) get
/// the same envelope as every other client error.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        "invalid_input",
        "Please provide an array of stock symbols",
    ));
    actix_web::error::InternalError::from_response(err, response).into()
}

pub async fn run_server(service: web::Data<AnalysisService>, port: u16) -> std::io::Result<()> {
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(Cors::permissive())
            .app_data(service.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(handlers::analyze)
            .service(handlers::health_check)
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
