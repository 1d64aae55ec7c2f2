use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid image file URL provided: {0}")]
    InvalidUrl(String),

    #[error("Could not retrieve image from URL: {0}")]
    FetchNetwork(String),

    #[error("Error fetching image from the provider: HTTP {status}")]
    FetchHttp { status: u16 },

    #[error("URL does not point to a valid image file. Content-Type received: {content_type}")]
    UnsupportedMediaType { content_type: String },

    #[error("Image file size exceeds the maximum limit of {limit_mb} MB (got {actual} bytes)")]
    PayloadTooLarge { limit_mb: u64, actual: u64 },

    #[error("Unsupported model identifier: {0}")]
    UnsupportedProvider(String),

    #[error("Prompt template missing: {0}")]
    PromptTemplateMissing(String),

    #[error("OCR backend call failed: {0}")]
    OcrBackend(String),

    #[error("Extraction backend call failed: {0}")]
    ExtractionBackend(String),

    #[error("Model returned output that is not a JSON object: {raw}")]
    MalformedModelOutput { raw: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Stable failure-kind name used in envelopes and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "InvalidURL",
            Self::FetchNetwork(_) => "FetchNetworkError",
            Self::FetchHttp { .. } => "FetchHTTPError",
            Self::UnsupportedMediaType { .. } => "UnsupportedMediaType",
            Self::PayloadTooLarge { .. } => "PayloadTooLarge",
            Self::UnsupportedProvider(_) => "UnsupportedProvider",
            Self::PromptTemplateMissing(_) => "PromptTemplateMissing",
            Self::OcrBackend(_) => "OcrBackendError",
            Self::ExtractionBackend(_) => "ExtractionBackendError",
            Self::MalformedModelOutput { .. } => "MalformedModelOutput",
            Self::Config(_) => "ConfigurationError",
            Self::Internal(_) => "UnexpectedInternalError",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidUrl(_) | GatewayError::FetchNetwork(_) => StatusCode::BAD_REQUEST,
            GatewayError::FetchHttp { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            GatewayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::UnsupportedProvider(_)
            | GatewayError::Config(_)
            | GatewayError::PromptTemplateMissing(_) => StatusCode::BAD_REQUEST,
            GatewayError::OcrBackend(_) | GatewayError::ExtractionBackend(_) => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::MalformedModelOutput { .. } | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "detail": self.to_string(),
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
