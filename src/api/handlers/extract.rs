//! The two extraction endpoints.
//!
//! Each handler fetches the image (fetch failures become HTTP error
//! statuses), runs the document-type pipeline, and wraps the outcome in the
//! envelope with the elapsed time. After the fetch, the HTTP transaction
//! always completes with 200; failures travel in the envelope body.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::response::ExtractResponse;
use crate::api::state::AppState;
use crate::pipeline::ExtractionPipeline;

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ExtractRequest {
    /// Absolute URL of the document photo to process.
    pub file_url: String,
    /// Extraction model identifier (`provider/model-name`). Defaults to the
    /// process-configured model. The OCR model is not caller-selectable.
    pub model_name: Option<String>,
}

/// `POST /api/v1/concrete_note`
#[utoipa::path(
    post,
    path = "/api/v1/concrete_note",
    tag = "concrete-note",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Extraction outcome envelope", body = ExtractResponse),
        (status = 400, description = "Invalid or unreachable URL"),
        (status = 413, description = "Image exceeds the size limit"),
        (status = 415, description = "URL does not point to an image"),
    )
)]
pub async fn concrete_note(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Response {
    let pipeline = state.concrete_note.clone();
    process(state, pipeline, request).await
}

/// `POST /api/v1/materials_delivery`
#[utoipa::path(
    post,
    path = "/api/v1/materials_delivery",
    tag = "materials-delivery",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Extraction outcome envelope", body = ExtractResponse),
        (status = 400, description = "Invalid or unreachable URL"),
        (status = 413, description = "Image exceeds the size limit"),
        (status = 415, description = "URL does not point to an image"),
    )
)]
pub async fn materials_delivery(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Response {
    let pipeline = state.materials_delivery.clone();
    process(state, pipeline, request).await
}

async fn process(
    state: AppState,
    pipeline: Arc<ExtractionPipeline>,
    request: ExtractRequest,
) -> Response {
    let start = Instant::now();
    let doc_type = pipeline.doc_type().as_str();

    let image = match state.fetcher.fetch(&request.file_url).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(
                doc_type,
                url = %request.file_url,
                kind = err.kind(),
                elapsed = ?start.elapsed(),
                "Image download failed"
            );
            return err.into_response();
        }
    };

    match pipeline.run(image, request.model_name.as_deref()).await {
        Ok(data) => {
            let elapsed = start.elapsed();
            tracing::info!(
                doc_type,
                url = %request.file_url,
                elapsed = ?elapsed,
                "Extraction succeeded"
            );
            Json(ExtractResponse::success(data, elapsed)).into_response()
        }
        Err(err) => {
            let elapsed = start.elapsed();
            tracing::error!(
                doc_type,
                url = %request.file_url,
                kind = err.kind(),
                error = %err,
                elapsed = ?elapsed,
                "Extraction failed"
            );
            Json(ExtractResponse::failure(&err, elapsed)).into_response()
        }
    }
}
