use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Client for a translation server speaking the JSON batch protocol
///
/// `POST {base}/translate_batch` with `{"texts": [...]}` answers
/// `{"translations": [...]}`; `POST {base}/translate` with `{"text": ...}`
/// answers `{"translation": ...}`.
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    /// Base URL of the translation server
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Per-request timeout
    timeout_secs: u64,
}

/// Batch request body
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Texts in document order
    pub texts: Vec<String>,
    /// Source language hint
    pub source_language: String,
    /// Target language hint
    pub target_language: String,
}

/// Batch response body
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Translations in request order
    pub translations: Vec<String>,
}

/// Single-text request body
#[derive(Debug, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

/// Single-text response body
#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    pub translation: String,
}

/// Error body returned by the server on 4xx/5xx
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl HttpTranslator {
    /// Create a client for the server at `endpoint`
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self> {
        let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            Url::parse(endpoint)?
        } else {
            Url::parse(&format!("http://{}", endpoint))?
        };

        if url.host_str().is_none() {
            return Err(anyhow!("Invalid host in endpoint: {}", endpoint));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            ProviderError::ConnectionError(e.to_string())
        } else {
            ProviderError::RequestFailed(e.to_string())
        }
    }

    /// POST a JSON body and decode a JSON answer
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&response_text)
                .map(|body| body.error)
                .unwrap_or(response_text);
            error!("Translation server error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<R>(&response_text).map_err(|e| {
            let preview: String = response_text.chars().take(200).collect();
            ProviderError::ParseError(format!("{} (body: {})", e, preview))
        })
    }
}

#[async_trait]
impl Provider for HttpTranslator {
    fn name(&self) -> &str {
        "http"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let request = BatchRequest {
            texts: texts.to_vec(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        };
        let response: BatchResponse = self.post("translate_batch", &request).await?;
        Ok(response.translations)
    }

    async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let request = TextRequest {
            text: text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        };
        let response: TextResponse = self.post("translate", &request).await?;
        Ok(response.translation)
    }
}
