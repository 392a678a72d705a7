//! Entry point for UI shells: quota gate, then the gateway.

use crate::config::Config;
use crate::gateway::Gateway;
use crate::outcome::{QueryOutcome, QueryStatus, USAGE_LIMIT_EXCEEDED};
use crate::quota::{custom_credential, QuotaPolicy};

pub struct Orchestrator {
    gateway: Gateway,
}

impl Orchestrator {
    /// Orchestrator backed by the configured HTTP services.
    pub fn new(config: &Config) -> Self {
        Self::with_gateway(Gateway::new(config))
    }

    /// Gate an existing gateway with the quota policy it reports against.
    pub fn with_gateway(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn quota(&self) -> QuotaPolicy {
        self.gateway.quota()
    }

    /// Answer one query.
    ///
    /// `usage_count` is the number of queries the caller used before this one.
    /// Callers without a credential who reached the free limit are refused
    /// before any network call.
    pub async fn handle_query(
        &self,
        query: &str,
        credential: Option<&str>,
        usage_count: u32,
    ) -> QueryOutcome {
        let quota = self.quota();
        let has_custom_credential = custom_credential(credential).is_some();
        if !has_custom_credential && quota.is_exhausted(usage_count) {
            tracing::info!(usage_count, "free quota exhausted");
            return QueryOutcome::failed(
                QueryStatus::RateLimited,
                USAGE_LIMIT_EXCEEDED,
                quota.remaining(false, usage_count),
                false,
            );
        }
        let outcome = self.gateway.complete(query, credential, usage_count).await;
        tracing::info!(
            status = outcome.status_code(),
            custom_key = outcome.used_custom_credential,
            refund = outcome.suppress_quota_charge,
            "query handled"
        );
        outcome
    }
}
