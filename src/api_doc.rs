use axum::Json;
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::models::HealthResponse;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "codebase-gateway API",
        version = "1.0.0",
        description = "Authenticating pass-through in front of the Codebase Query service"
    ),
    paths(
        handlers::health::health_handler,
        handlers::structure::structure_handler,
        handlers::content::content_handler
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "files", description = "Relayed Codebase Query operations")
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json handler
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
