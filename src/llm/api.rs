//! OpenAI-compatible chat client used by the Qwen and Vintern providers.

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse, ImageUrlArgs,
    },
    Client,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{GatewayError, Result};
use crate::imaging;
use crate::llm::provider::BackendError;

#[derive(Clone, Debug)]
pub struct OpenAiCompatClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAiCompatClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        temperature: f32,
        max_tokens: Option<u32>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let openai_config = OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(api_key.unwrap_or_default());

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(|e| {
            GatewayError::Internal(format!("Failed to create LLM HTTP client: {e}"))
        })?;

        // async-openai retries server errors with exponential backoff by
        // default; a zero max_elapsed_time disables that so a single failed
        // call ends the job.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            model,
            temperature,
            max_tokens,
        })
    }

    pub async fn complete_text(&self, prompt: &str) -> std::result::Result<String, BackendError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(invalid_request)?
            .into();

        let request = self.build_request(vec![message])?;
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;
        extract_content(response)
    }

    pub async fn complete_vision(
        &self,
        prompt: &str,
        image: &[u8],
    ) -> std::result::Result<String, BackendError> {
        let data_url = format!(
            "data:{};base64,{}",
            imaging::mime_type(image),
            STANDARD.encode(image)
        );

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(vec![
                ChatCompletionRequestMessageContentPartTextArgs::default()
                    .text(prompt)
                    .build()
                    .map_err(invalid_request)?
                    .into(),
                ChatCompletionRequestMessageContentPartImageArgs::default()
                    .image_url(
                        ImageUrlArgs::default()
                            .url(data_url)
                            .build()
                            .map_err(invalid_request)?,
                    )
                    .build()
                    .map_err(invalid_request)?
                    .into(),
            ])
            .build()
            .map_err(invalid_request)?
            .into();

        let request = self.build_request(vec![message])?;
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;
        extract_content(response)
    }

    fn build_request(
        &self,
        messages: Vec<async_openai::types::ChatCompletionRequestMessage>,
    ) -> std::result::Result<CreateChatCompletionRequest, BackendError> {
        let mut request = CreateChatCompletionRequestArgs::default();
        request
            .model(self.model.clone())
            .temperature(self.temperature)
            .messages(messages);

        if let Some(max_tokens) = self.max_tokens {
            request.max_tokens(max_tokens);
        }

        request.build().map_err(invalid_request)
    }
}

fn extract_content(
    response: CreateChatCompletionResponse,
) -> std::result::Result<String, BackendError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BackendError("response contained no choices".to_string()))?
        .message
        .content
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(BackendError("response contained empty content".to_string()));
    }

    Ok(content)
}

fn invalid_request(error: OpenAIError) -> BackendError {
    BackendError(format!("invalid chat request: {error}"))
}

fn map_openai_error(error: OpenAIError) -> BackendError {
    match error {
        OpenAIError::Reqwest(e) => BackendError(format!("request failed: {e}")),
        OpenAIError::ApiError(e) => BackendError(format!("API error: {e}")),
        OpenAIError::JSONDeserialize(e) => BackendError(format!("unparseable response: {e}")),
        other => BackendError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiCompatClient {
        OpenAiCompatClient::new(
            "http://localhost:8080/v1".to_string(),
            Some("dummy".to_string()),
            "Qwen/Qwen3-8B".to_string(),
            0.0,
            None,
            Some(5),
        )
        .unwrap()
    }

    #[test]
    fn test_build_request_carries_model_and_temperature() {
        let client = client();
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content("hello")
            .build()
            .unwrap()
            .into();

        let request = client.build_request(vec![message]).unwrap();
        assert_eq!(request.model, "Qwen/Qwen3-8B");
        assert_eq!(request.temperature, Some(0.0));
    }

    #[test]
    fn test_build_request_with_max_tokens() {
        let client = OpenAiCompatClient::new(
            "http://localhost:8081/v1".to_string(),
            None,
            "5CD-AI/Vintern-3B-R-beta".to_string(),
            0.5,
            Some(2048),
            None,
        )
        .unwrap();

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content("hello")
            .build()
            .unwrap()
            .into();
        let request = client.build_request(vec![message]).unwrap();
        #[allow(deprecated)]
        {
            assert_eq!(request.max_tokens, Some(2048));
        }
    }

    #[test]
    fn test_extract_content_empty_choices() {
        let response: CreateChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1,
            "model": "Qwen/Qwen3-8B",
            "choices": []
        }))
        .unwrap();

        let err = extract_content(response).unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
