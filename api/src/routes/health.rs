use actix_web::HttpResponse;

use sh_shared::types::response::ApiResponse;
use sh_shared::HealthResponse;

use crate::handlers::envelope;

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    envelope(ApiResponse::success(HealthResponse::healthy(), "Service is healthy"))
}
