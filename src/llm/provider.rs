use std::sync::Arc;

use thiserror::Error;

use crate::config::LlmConfig;
use crate::error::{GatewayError, Result};
use crate::llm::api::OpenAiCompatClient;
use crate::llm::gemini::GeminiClient;

/// Known model providers. The set is closed: anything else in the provider
/// segment is a configuration error, surfaced before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Google Gemini (cloud, generateContent wire format).
    Gemini,
    /// Self-hosted Qwen behind an OpenAI-compatible endpoint.
    Qwen,
    /// Vintern vision models (provider segment `5cd-ai`), OpenAI-compatible.
    Vintern,
}

impl ProviderKind {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment.to_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            "qwen" => Some(Self::Qwen),
            "5cd-ai" => Some(Self::Vintern),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Qwen => "qwen",
            Self::Vintern => "5cd-ai",
        }
    }
}

/// A validated `provider/model-name` identifier.
///
/// OpenAI-compatible backends are addressed by the full HF-style identifier
/// (e.g. `Qwen/Qwen3-8B` is the served model name); Gemini takes the bare
/// model segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId {
    provider: ProviderKind,
    raw: String,
    model: String,
}

impl ModelId {
    pub fn parse(identifier: &str) -> Result<Self> {
        let segments: Vec<&str> = identifier.split('/').collect();
        let [provider_segment, model_segment] = segments.as_slice() else {
            return Err(GatewayError::UnsupportedProvider(format!(
                "expected exactly two segments in '{identifier}'"
            )));
        };

        if model_segment.is_empty() {
            return Err(GatewayError::UnsupportedProvider(format!(
                "missing model name in '{identifier}'"
            )));
        }

        let provider = ProviderKind::from_segment(provider_segment).ok_or_else(|| {
            GatewayError::UnsupportedProvider(format!(
                "unknown provider '{provider_segment}' in '{identifier}'"
            ))
        })?;

        Ok(Self {
            provider,
            raw: identifier.to_string(),
            model: model_segment.to_string(),
        })
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// The full identifier as supplied by the caller.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The model segment alone.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Failure of a backend invocation, without stage attribution. The pipeline
/// maps these into `OcrBackendError` or `ExtractionBackendError` depending on
/// where the call happened.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

/// A resolved inference backend. Variants are interchangeable; nothing
/// downstream branches on provider identity.
#[derive(Clone, Debug)]
pub enum ChatBackend {
    OpenAiCompat(OpenAiCompatClient),
    Gemini(GeminiClient),
}

impl ChatBackend {
    /// Text-only completion.
    pub async fn complete_text(&self, prompt: &str) -> std::result::Result<String, BackendError> {
        match self {
            Self::OpenAiCompat(client) => client.complete_text(prompt).await,
            Self::Gemini(client) => client.complete_text(prompt).await,
        }
    }

    /// Multimodal completion: prompt text plus one image.
    pub async fn complete_vision(
        &self,
        prompt: &str,
        image: &[u8],
    ) -> std::result::Result<String, BackendError> {
        match self {
            Self::OpenAiCompat(client) => client.complete_vision(prompt, image).await,
            Self::Gemini(client) => client.complete_vision(prompt, image).await,
        }
    }
}

// Default sampling temperatures per provider.
const GEMINI_TEMPERATURE: f32 = 0.4;
const QWEN_TEMPERATURE: f32 = 0.0;
const VINTERN_TEMPERATURE: f32 = 0.5;
const VINTERN_MAX_TOKENS: u32 = 2048;

/// Maps a validated [`ModelId`] to a concrete backend bound to that
/// provider's endpoint, credential, and temperature. Backends carry no
/// cross-request state; one is constructed per pipeline invocation.
#[derive(Clone)]
pub struct LlmRegistry {
    config: Arc<LlmConfig>,
}

impl LlmRegistry {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            config: Arc::new(config.clone()),
        }
    }

    pub fn resolve(&self, id: &ModelId) -> Result<ChatBackend> {
        match id.provider() {
            ProviderKind::Gemini => {
                let api_key = self.config.gemini_api_key.clone().ok_or_else(|| {
                    GatewayError::Config("GEMINI_API_KEY is not set".to_string())
                })?;
                Ok(ChatBackend::Gemini(GeminiClient::new(
                    api_key,
                    self.config.gemini_base_url.clone(),
                    id.model().to_string(),
                    GEMINI_TEMPERATURE,
                    self.config.timeout_secs,
                )?))
            }
            ProviderKind::Qwen => {
                let base_url = self.config.qwen_base_url.clone().ok_or_else(|| {
                    GatewayError::Config("QWEN_LLM_URL is not set".to_string())
                })?;
                Ok(ChatBackend::OpenAiCompat(OpenAiCompatClient::new(
                    base_url,
                    self.config.qwen_token.clone(),
                    id.raw().to_string(),
                    QWEN_TEMPERATURE,
                    None,
                    self.config.timeout_secs,
                )?))
            }
            ProviderKind::Vintern => {
                let base_url = self.config.vintern_base_url.clone().ok_or_else(|| {
                    GatewayError::Config("VINTERN_LLM_URL is not set".to_string())
                })?;
                Ok(ChatBackend::OpenAiCompat(OpenAiCompatClient::new(
                    base_url,
                    self.config.qwen_token.clone(),
                    id.raw().to_string(),
                    VINTERN_TEMPERATURE,
                    Some(VINTERN_MAX_TOKENS),
                    self.config.timeout_secs,
                )?))
            }
        }
    }
}
