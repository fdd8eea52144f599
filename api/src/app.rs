//! Application factory
//!
//! Builds the Actix-web application around a shared [`AppState`]. The same
//! factory serves `main` and the integration tests.

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use sh_shared::types::response::{response_codes, ApiResponse};

use crate::handlers::{envelope, ApiError};
use crate::routes;
use crate::state::AppState;

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
    max_payload_size: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(json_config(max_payload_size))
        .app_data(query_config())
        .app_data(path_config())
        // Outermost first on the way in: request span, then CORS
        .wrap(Cors::permissive())
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(routes::health::health_check))
        .configure(routes::configure)
        .default_service(web::to(not_found))
}

/// Malformed or oversized JSON bodies are answered with a 400 envelope
fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            tracing::debug!(error = %err, "Rejected request body");
            ApiError::BadRequest(format!("Invalid request body: {}", err)).into()
        })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(format!("Invalid query string: {}", err)).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(format!("Invalid path parameter: {}", err)).into()
    })
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    envelope(ApiResponse::<()>::failure(
        response_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
