use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::ContentRequestError;
use crate::upstream::ForwardError;

/// Error response type
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Error type returned by the gateway's handlers and middleware
///
/// This is the single place where failures are translated into HTTP status
/// codes; everything below it returns plain `Result`s.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or unknown API key
    Unauthorized,
    /// The upstream call failed for any reason
    Upstream(ForwardError),
    /// Request body is not a JSON object
    InvalidBody(ContentRequestError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Invalid API Key".to_string()),
            ApiError::Upstream(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::InvalidBody(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<ForwardError> for ApiError {
    fn from(err: ForwardError) -> Self {
        ApiError::Upstream(err)
    }
}

impl From<ContentRequestError> for ApiError {
    fn from(err: ContentRequestError) -> Self {
        ApiError::InvalidBody(err)
    }
}
