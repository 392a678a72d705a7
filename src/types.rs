//! Wire types for the OpenAI-compatible Chat Completions API, plus the
//! four-field reply shape the assistant is prompted to emit.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Message roles
// ---------------------------------------------------------------------------

/// Conversation participant role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction message.
    System,
    /// End-user message.
    User,
    /// Assistant/model message.
    Assistant,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,

    /// Text content. Providers may send `null` for an empty assistant turn.
    pub content: Option<String>,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Chat completion request / response
// ---------------------------------------------------------------------------

/// `response_format` request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    /// Forces the provider into JSON-object output mode.
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Request body for POST /chat/completions.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier used for request routing.
    pub model: String,
    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// Response body from POST /chat/completions.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Finish reason of the first choice, if reported.
    pub fn finish_reason(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_deref())
    }

    /// Content of the first choice, if the provider sent any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

/// A single choice in the API response.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: Message,
    pub finish_reason: Option<String>,
}

/// Token usage reported by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

// ---------------------------------------------------------------------------
// Assistant reply
// ---------------------------------------------------------------------------

/// The structured object the assistant is asked to emit.
///
/// `content` is always present once a reply reaches a shell, though it may be
/// empty for intermediate steps such as `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl StructuredReply {
    /// A reply carrying only display text.
    pub fn content_only(content: impl Into<String>) -> Self {
        Self {
            step: None,
            content: content.into(),
            function: None,
            input: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_request_serializes_json_object_mode() {
        let request = ChatRequest {
            model: "llama3-70b-8192".to_string(),
            messages: vec![Message::system("sys"), Message::user("hi")],
            response_format: Some(ResponseFormat::json_object()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"], json!({"type": "json_object"}));
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "hi");
    }

    #[test]
    fn chat_request_omits_absent_response_format() {
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![Message::user("hi")],
            response_format: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn chat_response_first_content_handles_null_and_missing() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "id": "x",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": null}, "finish_reason": "stop"}]
        }))
        .unwrap();
        assert_eq!(resp.first_content(), None);

        let empty: ChatResponse = serde_json::from_value(json!({"id": "y", "choices": []})).unwrap();
        assert_eq!(empty.first_content(), None);
    }

    #[test]
    fn structured_reply_skips_absent_optional_fields() {
        let reply = StructuredReply::content_only("hello");
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value, json!({"content": "hello"}));
    }

    #[test]
    fn structured_reply_defaults_missing_content() {
        let parsed: StructuredReply = serde_json::from_str(r#"{"step": "action"}"#).unwrap();
        assert_eq!(parsed.step.as_deref(), Some("action"));
        assert_eq!(parsed.content, "");
    }

    #[test]
    fn chat_response_reads_finish_reason_and_usage() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "id": "chatcmpl-9",
            "choices": [{"message": {"role": "assistant", "content": "{}"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 30, "total_tokens": 150}
        }))
        .unwrap();
        assert_eq!(resp.id, "chatcmpl-9");
        assert_eq!(resp.finish_reason(), Some("stop"));
        assert_eq!(resp.usage.map(|usage| usage.total_tokens), Some(150));
    }
}
