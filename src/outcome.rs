//! The normalized result of one query.
//!
//! A [`QueryOutcome`] is a plain value: it tells the caller what to show and
//! whether to undo the optimistic usage charge, and never touches caller state.

use serde::Serialize;

use crate::quota::RemainingQuota;
use crate::types::StructuredReply;

pub const USAGE_LIMIT_EXCEEDED: &str =
    "Usage limit exceeded. Please provide your API key for unlimited access.";
pub const INVALID_API_KEY: &str = "Invalid API key. Please check your API key and try again.";
pub const SERVER_KEY_MISCONFIGURED: &str =
    "Server API key configuration error. Please try again later or use your own API key.";
pub const GENERATION_RECOVERY_FALLBACK: &str = "I understood your weather query, but had trouble processing it. Please try asking in a simpler way or try a different location.";

/// Outcome category. Each maps to one HTTP-style status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Answered, possibly after recovering from a provider failure.
    Ok,
    /// Free quota used up and no credential supplied.
    RateLimited,
    /// The caller's own credential was rejected.
    AuthFailed,
    /// The process-wide default credential was rejected.
    ServerMisconfigured,
    ProviderError,
    UnknownError,
}

impl QueryStatus {
    pub fn http_status(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::RateLimited => 429,
            Self::AuthFailed => 401,
            Self::ServerMisconfigured | Self::ProviderError | Self::UnknownError => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Reply(StructuredReply),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub status: QueryStatus,
    pub payload: Payload,
    pub remaining: RemainingQuota,
    pub used_custom_credential: bool,
    /// Set only for the generic generation-failure reply without a custom
    /// credential: the caller should refund the query it already counted.
    pub suppress_quota_charge: bool,
}

impl QueryOutcome {
    pub(crate) fn answered(
        reply: StructuredReply,
        remaining: RemainingQuota,
        used_custom_credential: bool,
    ) -> Self {
        Self {
            status: QueryStatus::Ok,
            payload: Payload::Reply(reply),
            remaining,
            used_custom_credential,
            suppress_quota_charge: false,
        }
    }

    /// Friendly reply for an unrecoverable structured-output failure.
    pub(crate) fn generation_fallback(
        remaining: RemainingQuota,
        used_custom_credential: bool,
    ) -> Self {
        Self {
            suppress_quota_charge: !used_custom_credential,
            ..Self::answered(
                StructuredReply::content_only(GENERATION_RECOVERY_FALLBACK),
                remaining,
                used_custom_credential,
            )
        }
    }

    pub(crate) fn failed(
        status: QueryStatus,
        message: impl Into<String>,
        remaining: RemainingQuota,
        used_custom_credential: bool,
    ) -> Self {
        Self {
            status,
            payload: Payload::Error(message.into()),
            remaining,
            used_custom_credential,
            suppress_quota_charge: false,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status.http_status()
    }

    pub fn reply(&self) -> Option<&StructuredReply> {
        match &self.payload {
            Payload::Reply(reply) => Some(reply),
            Payload::Error(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.payload {
            Payload::Reply(_) => None,
            Payload::Error(message) => Some(message.as_str()),
        }
    }
}

/// Wire shape: `{"error": ...}` for failures, otherwise the reply plus quota
/// fields and `no_usage_deduction` when the charge should be refunded.
#[derive(Serialize)]
struct WireOutcome<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<&'a StructuredReply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_usage: Option<RemainingQuota>,
    #[serde(skip_serializing_if = "Option::is_none")]
    using_custom_key: Option<bool>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    no_usage_deduction: bool,
}

impl Serialize for QueryOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match &self.payload {
            Payload::Error(message) => WireOutcome {
                error: Some(message.as_str()),
                response: None,
                remaining_usage: None,
                using_custom_key: None,
                no_usage_deduction: false,
            },
            Payload::Reply(reply) => WireOutcome {
                error: None,
                response: Some(reply),
                remaining_usage: Some(self.remaining),
                using_custom_key: Some(self.used_custom_credential),
                no_usage_deduction: self.suppress_quota_charge,
            },
        };
        wire.serialize(serializer)
    }
}
