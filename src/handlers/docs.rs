//! Serves the generated OpenAPI document.

use crate::docs::api_doc;
use crate::routes::API_BASE;
use axum::Json;
use utoipa::openapi::OpenApi;

pub async fn openapi() -> Json<OpenApi> {
    Json(api_doc(API_BASE))
}
