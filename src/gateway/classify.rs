//! Mapping of upstream failures onto the error taxonomy.

use serde_json::Value;

use crate::error::ApiError;

/// Longest raw body quoted back in a provider error message.
const MAX_BODY_PREVIEW: usize = 200;

/// Markers providers use when JSON mode could not produce a valid object.
const GENERATION_FAILURE_MARKERS: [&str; 2] = ["json_validate_failed", "Failed to generate JSON"];

/// What went wrong upstream. Variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// The presented credential was rejected (HTTP 401).
    Authentication,
    /// JSON mode failed; the provider may echo what the model produced.
    StructuredOutput { failed_generation: Option<String> },
    /// Any other non-2xx answer.
    Provider { message: String },
    /// No usable HTTP answer at all.
    Transport { message: String },
}

pub fn classify(err: &ApiError) -> UpstreamFailure {
    match err {
        ApiError::Status { code: 401, .. } => UpstreamFailure::Authentication,
        ApiError::Status { code, body } => {
            let parsed = serde_json::from_str::<Value>(body).ok();
            let error_object = parsed.as_ref().and_then(|value| value.get("error"));
            if GENERATION_FAILURE_MARKERS
                .iter()
                .any(|marker| body.contains(marker))
            {
                let failed_generation = error_object
                    .and_then(|error| error.get("failed_generation"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                return UpstreamFailure::StructuredOutput { failed_generation };
            }
            let detail = error_object
                .and_then(|error| error.get("message").or(Some(error)))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| body_preview(body));
            UpstreamFailure::Provider {
                message: format!("{detail} (status {code})"),
            }
        }
        ApiError::Http(inner) => UpstreamFailure::Transport {
            message: inner.to_string(),
        },
        ApiError::InvalidResponse(message) => UpstreamFailure::Transport {
            message: message.clone(),
        },
    }
}

fn body_preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    match trimmed.char_indices().nth(MAX_BODY_PREVIEW) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::failed_generation_body;

    #[test]
    fn unauthorized_is_authentication() {
        let err = ApiError::status(401, r#"{"error":{"message":"Invalid API Key"}}"#);
        assert_eq!(classify(&err), UpstreamFailure::Authentication);
    }

    #[test]
    fn json_validate_failed_carries_failed_generation() {
        let err = ApiError::status(400, failed_generation_body(r#"{"step": "output""#));
        assert_eq!(
            classify(&err),
            UpstreamFailure::StructuredOutput {
                failed_generation: Some(r#"{"step": "output""#.to_string())
            }
        );
    }

    #[test]
    fn generation_failure_without_payload_field() {
        let err = ApiError::status(400, "Failed to generate JSON");
        assert_eq!(
            classify(&err),
            UpstreamFailure::StructuredOutput {
                failed_generation: None
            }
        );
    }

    #[test]
    fn other_status_uses_provider_message() {
        let err = ApiError::status(
            503,
            r#"{"error":{"message":"Service Unavailable","type":"internal"}}"#,
        );
        assert_eq!(
            classify(&err),
            UpstreamFailure::Provider {
                message: "Service Unavailable (status 503)".to_string()
            }
        );
    }

    #[test]
    fn string_error_field_is_used_as_message() {
        let err = ApiError::status(429, r#"{"error":"rate limited"}"#);
        assert_eq!(
            classify(&err),
            UpstreamFailure::Provider {
                message: "rate limited (status 429)".to_string()
            }
        );
    }

    #[test]
    fn non_json_body_is_previewed() {
        let long = "x".repeat(500);
        let UpstreamFailure::Provider { message } = classify(&ApiError::status(502, long)) else {
            panic!("expected provider failure");
        };
        assert!(message.starts_with(&"x".repeat(200)));
        assert!(message.ends_with("... (status 502)"));

        let UpstreamFailure::Provider { message } = classify(&ApiError::status(500, "  ")) else {
            panic!("expected provider failure");
        };
        assert_eq!(message, "empty response body (status 500)");
    }

    #[test]
    fn invalid_response_is_transport() {
        let err = ApiError::InvalidResponse("model returned no choices".into());
        assert_eq!(
            classify(&err),
            UpstreamFailure::Transport {
                message: "model returned no choices".to_string()
            }
        );
    }
}
