//! Chat-completion gateway.
//!
//! Picks the credential, sends the fixed system prompt plus the user's query
//! in JSON-object mode, repairs whatever comes back, and folds every upstream
//! failure into a [`QueryOutcome`]. Nothing fails past this boundary.

mod classify;
mod recovery;

pub use classify::{classify, UpstreamFailure};
pub use recovery::{plan_recovery, recover_weather_content, RecoveryPlan};

use crate::api::{ApiClient, ModelClient};
use crate::config::Config;
use crate::outcome::{QueryOutcome, QueryStatus, INVALID_API_KEY, SERVER_KEY_MISCONFIGURED};
use crate::prompt::system_prompt;
use crate::quota::{custom_credential, QuotaPolicy};
use crate::repair::repair_with_stage;
use crate::types::{ChatRequest, Message, ResponseFormat, StructuredReply};
use crate::weather::{WeatherLookup, WttrClient};

pub struct Gateway {
    /// Model client implementation (HTTP client in prod, mocks in tests).
    model: Box<dyn ModelClient>,
    weather: Box<dyn WeatherLookup>,
    model_id: String,
    /// Process-wide credential for callers without their own.
    default_api_key: Option<String>,
    quota: QuotaPolicy,
}

impl Gateway {
    /// Gateway wired to the configured HTTP endpoints.
    pub fn new(config: &Config) -> Self {
        Self::with_clients(
            config,
            Box::new(ApiClient::new(&config.api)),
            Box::new(WttrClient::new(&config.weather)),
        )
    }

    /// Gateway with explicit model and weather implementations.
    pub fn with_clients(
        config: &Config,
        model: Box<dyn ModelClient>,
        weather: Box<dyn WeatherLookup>,
    ) -> Self {
        let default_api_key =
            (!config.api.missing_default_key()).then(|| config.api.api_key.trim().to_string());
        Self {
            model,
            weather,
            model_id: config.api.model.clone(),
            default_api_key,
            quota: QuotaPolicy::from(&config.quota),
        }
    }

    /// Free-tier policy used for the remaining counts this gateway reports.
    pub fn quota(&self) -> QuotaPolicy {
        self.quota
    }

    /// Run one query upstream and normalize the result.
    ///
    /// `usage_count` is the number of queries the caller used before this
    /// one; the reported remaining quota already counts this query.
    pub async fn complete(
        &self,
        query: &str,
        credential: Option<&str>,
        usage_count: u32,
    ) -> QueryOutcome {
        let custom = custom_credential(credential);
        let has_custom_credential = custom.is_some();
        let bearer = custom.or(self.default_api_key.as_deref());
        let remaining = self.quota.remaining_after(has_custom_credential, usage_count);

        let request = ChatRequest {
            model: self.model_id.clone(),
            messages: vec![Message::system(system_prompt()), Message::user(query)],
            response_format: Some(ResponseFormat::json_object()),
        };

        match self.model.chat(&request, bearer).await {
            Ok(response) => {
                let raw = response.first_content().unwrap_or_default();
                let (reply, stage) = repair_with_stage(raw, query);
                tracing::debug!(?stage, "model reply normalized");
                QueryOutcome::answered(reply, remaining, has_custom_credential)
            }
            Err(err) => {
                let failure = classify(&err);
                tracing::warn!(
                    status = ?err.status_code(),
                    error = %err,
                    ?failure,
                    "chat completion failed"
                );
                match failure {
                    UpstreamFailure::Authentication if has_custom_credential => {
                        QueryOutcome::failed(
                            QueryStatus::AuthFailed,
                            INVALID_API_KEY,
                            remaining,
                            true,
                        )
                    }
                    UpstreamFailure::Authentication => QueryOutcome::failed(
                        QueryStatus::ServerMisconfigured,
                        SERVER_KEY_MISCONFIGURED,
                        remaining,
                        false,
                    ),
                    UpstreamFailure::StructuredOutput { failed_generation } => {
                        let recovered = match failed_generation.as_deref() {
                            Some(payload) => {
                                recover_weather_content(payload, self.weather.as_ref()).await
                            }
                            None => None,
                        };
                        match recovered {
                            Some(content) => QueryOutcome::answered(
                                StructuredReply::content_only(content),
                                remaining,
                                has_custom_credential,
                            ),
                            None => {
                                QueryOutcome::generation_fallback(remaining, has_custom_credential)
                            }
                        }
                    }
                    UpstreamFailure::Provider { message } => QueryOutcome::failed(
                        QueryStatus::ProviderError,
                        format!("API Error: {message}"),
                        remaining,
                        has_custom_credential,
                    ),
                    UpstreamFailure::Transport { message } => QueryOutcome::failed(
                        QueryStatus::UnknownError,
                        format!("An error occurred: {message}"),
                        remaining,
                        has_custom_credential,
                    ),
                }
            }
        }
    }
}
