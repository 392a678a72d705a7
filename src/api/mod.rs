//! HTTP client for OpenAI-compatible chat-completion APIs.

use crate::error::ApiError;
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;

mod client;
pub(crate) mod transport;

pub use client::ApiClient;

/// Minimal model API interface used by the gateway.
///
/// The bearer credential is chosen per request because each query may carry
/// its own key. Tests provide canned implementations without network calls.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn chat(
        &self,
        request: &ChatRequest,
        api_key: Option<&str>,
    ) -> Result<ChatResponse, ApiError>;
}
