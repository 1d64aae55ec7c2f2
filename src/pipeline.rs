//! Two-stage extraction pipeline: normalize → OCR → extract → parse.
//!
//! One pipeline instance exists per document type, bound to that type's
//! prompt templates. Stages run strictly in sequence and a failure at any
//! stage ends the job; nothing is retried.

use serde_json::{Map, Value};

use crate::config::OcrConfig;
use crate::error::{GatewayError, Result};
use crate::imaging;
use crate::llm::{LlmRegistry, ModelId};
use crate::templates::{DocumentPrompts, DocumentType};

pub struct ExtractionPipeline {
    doc_type: DocumentType,
    registry: LlmRegistry,
    prompts: DocumentPrompts,
    /// Process-fixed OCR model, independent of the caller-selected
    /// extraction model.
    ocr_model: ModelId,
    default_model: ModelId,
    max_image_dimension: u32,
}

impl ExtractionPipeline {
    pub fn new(
        doc_type: DocumentType,
        registry: LlmRegistry,
        prompts: DocumentPrompts,
        ocr: &OcrConfig,
        default_model: &str,
    ) -> Result<Self> {
        Ok(Self {
            doc_type,
            registry,
            prompts,
            ocr_model: ModelId::parse(&ocr.model)?,
            default_model: ModelId::parse(default_model)?,
            max_image_dimension: ocr.max_image_dimension,
        })
    }

    pub fn doc_type(&self) -> DocumentType {
        self.doc_type
    }

    /// Run one job: OCR the image, then extract structured fields from the
    /// recognized text. Returns the parsed JSON object.
    pub async fn run(
        &self,
        image: Vec<u8>,
        caller_model: Option<&str>,
    ) -> Result<Map<String, Value>> {
        // Resolve the extraction backend up front so a bad model identifier
        // fails before any outbound model call.
        let extraction_model = match caller_model {
            Some(identifier) => ModelId::parse(identifier)?,
            None => self.default_model.clone(),
        };
        let extraction_backend = self.registry.resolve(&extraction_model)?;
        let ocr_backend = self.registry.resolve(&self.ocr_model)?;

        let image = imaging::normalize_image(image, self.max_image_dimension);

        tracing::debug!(doc_type = self.doc_type.as_str(), model = %self.ocr_model, "OCR stage");
        let ocr_text = ocr_backend
            .complete_vision(&self.prompts.ocr, &image)
            .await
            .map_err(|e| GatewayError::OcrBackend(e.to_string()))?;

        tracing::debug!(
            doc_type = self.doc_type.as_str(),
            model = %extraction_model,
            ocr_len = ocr_text.len(),
            "Extraction stage"
        );
        let extraction_prompt = self.prompts.render_extraction(&ocr_text);
        let reply = extraction_backend
            .complete_text(&extraction_prompt)
            .await
            .map_err(|e| GatewayError::ExtractionBackend(e.to_string()))?;

        parse_json_object(&reply)
    }
}

/// Parse a model reply as a JSON object, tolerating a surrounding markdown
/// code fence.
fn parse_json_object(reply: &str) -> Result<Map<String, Value>> {
    let trimmed = strip_code_fence(reply.trim());

    let value: Value =
        serde_json::from_str(trimmed).map_err(|_| GatewayError::MalformedModelOutput {
            raw: reply.to_string(),
        })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(GatewayError::MalformedModelOutput {
            raw: reply.to_string(),
        }),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the fence line.
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    rest.strip_suffix("```").map(str::trim).unwrap_or(text)
}
