use crate::models::HealthResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, Json};

/// GET / handler - Health check endpoint
///
/// Never contacts the upstream service, so the answer does not depend on its
/// availability.
#[utoipa::path(
    get,
    path = routes::ROOT,
    responses(
        (status = 200, description = "Gateway is running", body = HealthResponse),
        (status = 401, description = "Invalid API key (only when HEALTH_REQUIRES_AUTH is set)", body = crate::error::ErrorResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    tracing::debug!("Health check");
    Json(HealthResponse {
        message: format!("{} is running", state.config.service_name),
    })
}
