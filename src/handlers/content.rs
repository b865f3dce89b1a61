use crate::error::{ApiError, ErrorResponse};
use crate::models::ContentRequest;
use crate::routes;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, Json};
use serde_json::value::RawValue;

/// POST /files/content handler - Relay a file content request
///
/// The body must be a JSON object; beyond that it is passed to the upstream
/// service untouched. A `content-type` header is not required.
#[utoipa::path(
    post,
    path = routes::FILES_CONTENT,
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Upstream file content, relayed verbatim", body = serde_json::Value),
        (status = 401, description = "Invalid API key", body = ErrorResponse),
        (status = 422, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 500, description = "Upstream call failed", body = ErrorResponse)
    ),
    params(
        ("x-api-key" = String, Header, description = "Registered API key")
    ),
    tag = "files"
)]
pub async fn content_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Box<RawValue>>, ApiError> {
    let payload = ContentRequest::from_slice(&body)?;
    let body = state.upstream.file_content(&payload).await?;
    Ok(Json(body))
}
