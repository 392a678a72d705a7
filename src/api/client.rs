//! Production [`ModelClient`] backed by `reqwest`.

use super::transport::build_http_client;
use super::ModelClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use std::time::Duration;

/// Client for OpenAI-compatible chat-completion APIs.
///
/// Issues exactly one HTTP request per call. There are no retries.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from resolved API configuration.
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: build_http_client(config.timeout_secs.map(Duration::from_secs)),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// POST one JSON-mode completion. A blank key sends no `Authorization`.
    pub async fn chat(
        &self,
        request: &ChatRequest,
        api_key: Option<&str>,
    ) -> Result<ChatResponse, ApiError> {
        let url = self.completions_url();
        tracing::debug!(model = %request.model, %url, "dispatching chat completion");

        let mut builder = self.http.post(&url).json(request);
        match api_key.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => builder = builder.bearer_auth(key),
            None => tracing::warn!("chat completion sent without a credential"),
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "chat completion rejected");
            return Err(ApiError::status(status.as_u16(), body));
        }

        let parsed: ChatResponse = response.json().await?;
        if parsed.choices.is_empty() {
            return Err(ApiError::InvalidResponse(
                "model returned no choices".to_string(),
            ));
        }
        tracing::debug!(
            id = %parsed.id,
            finish_reason = ?parsed.finish_reason(),
            prompt_tokens = ?parsed.usage.as_ref().map(|usage| usage.prompt_tokens),
            completion_tokens = ?parsed.usage.as_ref().map(|usage| usage.completion_tokens),
            total_tokens = ?parsed.usage.as_ref().map(|usage| usage.total_tokens),
            "chat completion received"
        );
        Ok(parsed)
    }
}

#[async_trait]
impl ModelClient for ApiClient {
    async fn chat(
        &self,
        request: &ChatRequest,
        api_key: Option<&str>,
    ) -> Result<ChatResponse, ApiError> {
        ApiClient::chat(self, request, api_key).await
    }
}
