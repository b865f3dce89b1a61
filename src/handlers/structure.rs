use crate::error::{ApiError, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde_json::value::RawValue;

/// GET /files/structure handler - Relay the project's file tree
#[utoipa::path(
    get,
    path = routes::FILES_STRUCTURE,
    responses(
        (status = 200, description = "Upstream file structure, relayed verbatim", body = serde_json::Value),
        (status = 401, description = "Invalid API key", body = ErrorResponse),
        (status = 500, description = "Upstream call failed", body = ErrorResponse)
    ),
    params(
        ("x-api-key" = String, Header, description = "Registered API key")
    ),
    tag = "files"
)]
pub async fn structure_handler(
    State(state): State<AppState>,
) -> Result<Json<Box<RawValue>>, ApiError> {
    let body = state.upstream.file_structure().await?;
    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use crate::auth::API_KEY_HEADER;
    use crate::error::ErrorResponse;
    use crate::handlers::test_support::{test_app, VALID_KEY};
    use axum::{body::Body, http::{Request, StatusCode}};
    use httpmock::prelude::*;
    use serde_json::{json, Value as JsonValue};
    use std::time::Duration;
    use tower::ServiceExt;

    fn structure_request(key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri("/files/structure");
        if let Some(key) = key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_structure_relays_upstream_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/files/structure");
                then.status(200).json_body(json!({"files": ["a.txt"]}));
            })
            .await;

        let response = test_app(&server.base_url())
            .oneshot(structure_request(Some(VALID_KEY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let response_json: JsonValue = serde_json::from_slice(&body).unwrap();
        assert_eq!(response_json, json!({"files": ["a.txt"]}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_structure_relays_body_text_verbatim() {
        let upstream_body = r#"{"zeta":1,"alpha":{"size":123456789012345678901234567890}}"#;
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files/structure");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(upstream_body);
            })
            .await;

        let response = test_app(&server.base_url())
            .oneshot(structure_request(Some(VALID_KEY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], upstream_body.as_bytes());
    }

    #[tokio::test]
    async fn test_structure_rejects_unknown_key_without_upstream_call() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/files/structure");
                then.status(200).json_body(json!({"files": []}));
            })
            .await;
        let app = test_app(&server.base_url());

        let missing = app.clone().oneshot(structure_request(None)).await.unwrap();
        let unknown = app.oneshot(structure_request(Some("K2"))).await.unwrap();

        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        mock.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn test_structure_unreachable_upstream() {
        let response = test_app("http://127.0.0.1:1")
            .oneshot(structure_request(Some(VALID_KEY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.detail.starts_with("Error retrieving file structure:"));
    }

    #[tokio::test]
    async fn test_structure_upstream_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files/structure");
                then.status(503).json_body(json!({"detail": "indexing"}));
            })
            .await;

        let response = test_app(&server.base_url())
            .oneshot(structure_request(Some(VALID_KEY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.detail.starts_with("Error retrieving file structure:"));
        assert!(error_response.detail.contains("503"));
    }

    #[tokio::test]
    async fn test_structure_timeout_uses_same_error_shape() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files/structure");
                then.status(200)
                    .delay(Duration::from_millis(1500))
                    .json_body(json!({"files": []}));
            })
            .await;
        let mut config = crate::handlers::test_support::test_config(&server.base_url());
        config.upstream_timeout = Duration::from_millis(200);

        let response = crate::handlers::test_support::app_with(config)
            .oneshot(structure_request(Some(VALID_KEY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error_response.detail.starts_with("Error retrieving file structure:"));
    }
}
