use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;

/// Response type for the health check endpoint
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub message: String,
}

/// Why a file content request body was refused
#[derive(Debug, Error)]
pub enum ContentRequestError {
    #[error("Request body is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("Request body must be a JSON object")]
    NotAnObject,
}

/// Body of a file content request
///
/// An arbitrary JSON object, typically naming the files to read. Its shape is
/// owned by the upstream service. The original text is kept, so key order and
/// number precision survive the trip upstream.
#[derive(Debug)]
pub struct ContentRequest(Box<RawValue>);

impl ContentRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, ContentRequestError> {
        let raw: Box<RawValue> = serde_json::from_slice(body)?;
        if !raw.get().trim_start().starts_with('{') {
            return Err(ContentRequestError::NotAnObject);
        }
        Ok(Self(raw))
    }

    pub fn as_raw(&self) -> &RawValue {
        &self.0
    }
}
