use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api_doc;
use crate::auth::require_api_key;
use crate::handlers::{content_handler, health_handler, structure_handler};
use crate::state::AppState;

// Route path constants - single source of truth for all API paths

pub const ROOT: &str = "/";
pub const FILES_STRUCTURE: &str = "/files/structure";
pub const FILES_CONTENT: &str = "/files/content";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Assemble the request pipeline
///
/// Order, outermost first: request tracing, then the API key gate, then
/// route dispatch. By default the gate is a route layer on the file routes
/// only. With `health_requires_auth` it wraps the whole router, fallback
/// included, so every request without a valid key gets 401.
pub fn router(state: AppState) -> Router {
    let gate = middleware::from_fn_with_state(state.config.api_keys.clone(), require_api_key);

    let files = Router::new()
        .route(FILES_STRUCTURE, get(structure_handler))
        .route(FILES_CONTENT, post(content_handler));

    let service = Router::new()
        .route(ROOT, get(health_handler))
        .route(OPENAPI_JSON, get(api_doc::openapi_handler));

    let app = if state.config.health_requires_auth {
        service.merge(files).layer(gate)
    } else {
        service.merge(files.route_layer(gate))
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}
