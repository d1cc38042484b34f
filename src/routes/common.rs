//! Common routes: health, readiness, version and the OpenAPI document.

use crate::docs::OPENAPI_PATH;
use crate::handlers::common::{health, ready, version};
use crate::handlers::docs::openapi;
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET /health, /ready (database check), /version and the API docs.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .route(OPENAPI_PATH, get(openapi))
        .with_state(state)
}
