//! Remote image retrieval with content-type and size policy.
//!
//! The fetcher is the only component that talks to caller-supplied URLs.
//! It classifies every failure (`InvalidURL`, `FetchNetworkError`,
//! `FetchHTTPError`, `UnsupportedMediaType`, `PayloadTooLarge`) so the
//! handlers can surface fetch problems as explicit client-error statuses
//! before the pipeline runs.

use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use url::Url;

use crate::config::FetchConfig;
use crate::error::{GatewayError, Result};

#[derive(Clone, Debug)]
pub struct ImageFetcher {
    client: Client,
    max_bytes: u64,
    limit_mb: u64,
}

impl ImageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_bytes: config.max_file_size_bytes(),
            limit_mb: config.max_file_size_mb,
        })
    }

    /// Download an image, enforcing the content-type and size policy.
    ///
    /// The content-type check happens on headers alone; a non-`image/*`
    /// response is rejected without reading the body. The body is streamed
    /// and accumulation stops as soon as the size cap is exceeded.
    pub async fn fetch(&self, file_url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(file_url)
            .map_err(|e| GatewayError::InvalidUrl(format!("{file_url}: {e}")))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::FetchNetwork(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %file_url, status = status.as_u16(), "Upstream returned error status");
            return Err(GatewayError::FetchHttp {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.starts_with("image/") {
            tracing::warn!(url = %file_url, content_type = %content_type, "URL is not an image");
            return Err(GatewayError::UnsupportedMediaType { content_type });
        }

        // A Content-Length over the limit is rejected before any body bytes
        // are pulled.
        if let Some(declared) = response.content_length() {
            if declared > self.max_bytes {
                tracing::warn!(url = %file_url, declared, max = self.max_bytes, "Image over size limit");
                return Err(GatewayError::PayloadTooLarge {
                    limit_mb: self.limit_mb,
                    actual: declared,
                });
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| GatewayError::FetchNetwork(e.to_string()))?;
            let total = body.len() as u64 + chunk.len() as u64;
            if total > self.max_bytes {
                tracing::warn!(url = %file_url, at_least = total, max = self.max_bytes, "Image over size limit");
                return Err(GatewayError::PayloadTooLarge {
                    limit_mb: self.limit_mb,
                    actual: total,
                });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::info!(url = %file_url, size = body.len(), "Image downloaded");
        Ok(body)
    }
}
