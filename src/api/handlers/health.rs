use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

/// Health data for the gateway and its configured providers.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub ocr_model: String,
    pub default_model: String,
    pub providers: ProviderStatus,
}

/// Whether each provider has the configuration it needs to be resolvable.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ProviderStatus {
    pub gemini: bool,
    pub qwen: bool,
    pub vintern: bool,
}

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "status",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let llm = &state.config.llm;
    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr_model: state.config.ocr.model.clone(),
        default_model: llm.default_model.clone(),
        providers: ProviderStatus {
            gemini: llm.gemini_api_key.is_some(),
            qwen: llm.qwen_base_url.is_some(),
            vintern: llm.vintern_base_url.is_some(),
        },
    })
}
