use axum::Json;
use utoipa::OpenApi;

use super::handlers;
use super::response::{ExtractResponse, ExtractStatus};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notelens API",
        description = "Gateway turning delivery note photos into structured JSON",
    ),
    paths(
        handlers::health::health_check,
        handlers::extract::concrete_note,
        handlers::extract::materials_delivery,
    ),
    components(schemas(
        ExtractResponse,
        ExtractStatus,
        handlers::extract::ExtractRequest,
        handlers::health::HealthData,
        handlers::health::ProviderStatus,
    ))
)]
pub struct ApiDoc;

/// `GET /api/v1/openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
