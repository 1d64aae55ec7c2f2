//! Extraction response envelope.
//!
//! Both extraction endpoints return this shape with HTTP 200 once the
//! pipeline has started: success and pipeline failure are communicated in the
//! body, never as an unhandled fault. Only pre-pipeline validation (bad URL,
//! non-image or oversized payload) is surfaced as an HTTP error status.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GatewayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExtractStatus {
    Success,
    Error,
}

/// The uniform result wrapper for extraction requests.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExtractResponse {
    pub status: ExtractStatus,
    /// Extracted fields. Present on success, null on error. The schema is
    /// document-type-dependent and not constrained here.
    #[schema(value_type = Option<Object>)]
    pub data: Option<Map<String, Value>>,
    /// Wall-clock seconds from request acceptance to envelope construction.
    pub processing_time: f64,
    pub error_message: Option<String>,
}

impl ExtractResponse {
    pub fn success(data: Map<String, Value>, elapsed: Duration) -> Self {
        Self {
            status: ExtractStatus::Success,
            data: Some(data),
            processing_time: elapsed.as_secs_f64(),
            error_message: None,
        }
    }

    /// Error envelope. The message names the failure kind and its detail.
    pub fn failure(err: &GatewayError, elapsed: Duration) -> Self {
        Self {
            status: ExtractStatus::Error,
            data: None,
            processing_time: elapsed.as_secs_f64(),
            error_message: Some(format!("{}: {}", err.kind(), err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let mut data = Map::new();
        data.insert("quantity".to_string(), Value::from(10));

        let resp = ExtractResponse::success(data, Duration::from_millis(1500));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["quantity"], 10);
        assert_eq!(json["error_message"], Value::Null);
        assert!((json["processing_time"].as_f64().unwrap() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn failure_envelope_names_the_kind() {
        let err = GatewayError::MalformedModelOutput {
            raw: "sorry I cannot read this".to_string(),
        };
        let resp = ExtractResponse::failure(&err, Duration::from_secs(2));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["data"], Value::Null);
        let message = json["error_message"].as_str().unwrap();
        assert!(message.contains("MalformedModelOutput"));
        assert!(message.contains("sorry I cannot read this"));
    }

    #[test]
    fn failure_envelope_always_has_processing_time() {
        let err = GatewayError::OcrBackend("timed out".to_string());
        let resp = ExtractResponse::failure(&err, Duration::from_millis(250));
        assert!((resp.processing_time - 0.25).abs() < 1e-9);
    }
}
