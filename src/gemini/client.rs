use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::gemini::content::GeminiContent;
use crate::gemini::request::GenerateContentRequest;
use crate::gemini::response::GenerateContentResponse;

/// Any failure between building the outbound call and extracting its text.
/// The HTTP layer collapses every variant into one generic 500; the variants
/// exist for logging, not for the caller.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gemini returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode Gemini response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Gemini response carried no text candidate")]
    EmptyResponse,
}

/// The one capability the relay needs from the hosted model service. Injected
/// as a trait object so tests can substitute a counting double.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, contents: Vec<GeminiContent>) -> Result<String, UpstreamError>;
}

/// reqwest-backed client for the Gemini `generateContent` API. Stateless
/// between calls; one instance is shared by all request handlers.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: Arc<reqwest::Client>,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        http_client: Arc<reqwest::Client>,
        api_base: String,
        api_key: String,
        model: String,
    ) -> Self {
        Self {
            http_client,
            api_base,
            api_key,
            model,
        }
    }

    fn target_url(&self) -> String {
        let path = format!("models/{}:generateContent", self.model);
        let base = if self.api_base.ends_with('/') {
            format!("{}{}", self.api_base, path)
        } else {
            format!("{}/{}", self.api_base, path)
        };
        if self.api_key.is_empty() {
            base
        } else {
            format!("{}?key={}", base, self.api_key)
        }
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, contents: Vec<GeminiContent>) -> Result<String, UpstreamError> {
        let body = GenerateContentRequest { contents };
        let target_url = self.target_url();

        info!("Forwarding chat turn to model {}", self.model);
        debug!(
            "request body: {}",
            serde_json::to_string(&body).unwrap_or_else(|e| format!("<unserializable: {}>", e))
        );

        let response = self
            .http_client
            .post(&target_url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Gemini call failed with status {}: {}", status, body);
            return Err(UpstreamError::Status { status, body });
        }

        // The raw body is logged in full before extraction, for operator
        // diagnosis of safety blocks and empty candidates.
        let raw = response.text().await?;
        info!("Gemini API response: {}", raw);

        let parsed: GenerateContentResponse = serde_json::from_str(&raw)?;
        parsed.text().ok_or(UpstreamError::EmptyResponse)
    }
}
