use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ChatRole, DocumentId, Plan};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub plan: Plan,
}

/// Body of both the login and register responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub pdf_name: String,
    /// Kept exactly as the server rendered it.
    pub created_at: String,
    #[serde(default)]
    pub insert_status: bool,
}

impl DocumentRecord {
    pub fn created_at_parsed(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created_at)
    }
}

/// `GET /documents/{id}` has been seen both bare and wrapped in `document`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DocumentEnvelope {
    Wrapped { document: DocumentRecord },
    Bare(DocumentRecord),
}

impl DocumentEnvelope {
    pub fn into_record(self) -> DocumentRecord {
        match self {
            DocumentEnvelope::Wrapped { document } => document,
            DocumentEnvelope::Bare(document) => document,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: None,
        }
    }

    pub fn user_now(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            created_at: Some(Utc::now().to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    #[serde(default)]
    pub chats: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequestBody {
    pub query: String,
}

/// Assistant answer to a posted question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(alias = "response", alias = "answer")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ChatRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<ChatReply> for ChatMessage {
    fn from(reply: ChatReply) -> Self {
        Self {
            role: reply.role.unwrap_or(ChatRole::Assistant),
            content: reply.content,
            created_at: reply
                .created_at
                .or_else(|| Some(Utc::now().to_rfc3339())),
        }
    }
}

/// Accepts RFC 3339 as well as the naive ISO form the backend stores.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_envelope_accepts_bare_and_wrapped_shapes() {
        let bare = r#"{"id":"6f1c2f5e-8a43-4d7c-9b0e-2a6d9b1f0c11","pdf_name":"a.pdf","created_at":"2025-04-01T10:00:00"}"#;
        let wrapped = format!(r#"{{"document":{bare}}}"#);

        let bare: DocumentEnvelope = serde_json::from_str(bare).expect("bare");
        let wrapped: DocumentEnvelope = serde_json::from_str(&wrapped).expect("wrapped");

        assert_eq!(bare.into_record(), wrapped.into_record());
    }

    #[test]
    fn missing_insert_status_defaults_to_not_ingested() {
        let record: DocumentRecord = serde_json::from_str(
            r#"{"id":"6f1c2f5e-8a43-4d7c-9b0e-2a6d9b1f0c11","pdf_name":"a.pdf","created_at":"x"}"#,
        )
        .expect("record");
        assert!(!record.insert_status);
    }

    #[test]
    fn chat_reply_accepts_response_alias_and_defaults_to_assistant() {
        let reply: ChatReply = serde_json::from_str(r#"{"response":"42"}"#).expect("reply");
        let message = ChatMessage::from(reply);
        assert_eq!(message.role, ChatRole::Assistant);
        assert_eq!(message.content, "42");
        assert!(message.created_at.is_some());
    }

    #[test]
    fn parses_naive_and_rfc3339_timestamps() {
        assert!(parse_timestamp("2025-04-01T10:00:00.123456").is_some());
        assert!(parse_timestamp("2025-04-01 10:00:00").is_some());
        assert!(parse_timestamp("2025-04-01T10:00:00Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
