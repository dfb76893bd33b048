//! Boundary value types exchanged with the host application.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;
use validator::Validate;

/// Who said a history turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Other,
}

impl Role {
    fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("user") {
            Role::User
        } else {
            Role::Other
        }
    }
}

/// One turn of prior conversation supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct HistoryTurn {
    pub role: Role,
    /// The text of the turn. Must not be empty.
    #[validate(length(min = 1))]
    pub text: String,
}

impl HistoryTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Coerces loosely shaped JSON history into validated turns.
///
/// Only a JSON array is accepted. Entries that are not objects, carry no
/// text (`text`, `content` or `message`), or fail validation are skipped.
pub fn parse_history(value: &Value) -> Vec<HistoryTurn> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    let turns: Vec<HistoryTurn> = entries
        .iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            let role = obj
                .get("role")
                .and_then(Value::as_str)
                .map(Role::from_label)
                .unwrap_or(Role::Other);
            let text = ["text", "content", "message"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str))?;
            let turn = HistoryTurn::new(role, text.trim());
            turn.validate().ok().map(|_| turn)
        })
        .collect();

    if turns.len() != entries.len() {
        debug!(
            "Dropped {} malformed history entries",
            entries.len() - turns.len()
        );
    }
    turns
}

fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<HistoryTurn>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_history(&value))
}

/// A chat request as received from the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_history")]
    pub history: Vec<HistoryTurn>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryTurn>) -> Self {
        self.history = history;
        self
    }
}

/// Successful chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub contexts: Vec<String>,
}

/// Why a chat request did not produce a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Rejected before reaching the engine (caller error).
    Rejected,
    /// The engine failed while processing.
    Failed,
}

/// Failed chat request; never carries internal stack traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFailure {
    #[serde(skip)]
    pub kind: Option<FailureKind>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ChatFailure {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: Some(FailureKind::Rejected),
            message: message.into(),
            detail: None,
        }
    }

    pub fn failed(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: Some(FailureKind::Failed),
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.kind == Some(FailureKind::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_history_valid_entries() {
        let value = json!([
            {"role": "user", "text": "halo"},
            {"role": "assistant", "content": "Hai! Ada yang bisa dibantu?"},
        ]);
        let turns = parse_history(&value);

        assert_eq!(
            turns,
            vec![
                HistoryTurn::new(Role::User, "halo"),
                HistoryTurn::new(Role::Other, "Hai! Ada yang bisa dibantu?"),
            ]
        );
    }

    #[test]
    fn test_parse_history_skips_malformed() {
        let value = json!([
            "just a string",
            {"role": "user"},
            {"role": "user", "text": "   "},
            {"text": 42},
            {"text": "tanpa role"},
        ]);
        let turns = parse_history(&value);

        assert_eq!(turns, vec![HistoryTurn::new(Role::Other, "tanpa role")]);
    }

    #[test]
    fn test_parse_history_non_array() {
        assert!(parse_history(&json!({"role": "user"})).is_empty());
        assert!(parse_history(&Value::Null).is_empty());
    }

    #[test]
    fn test_chat_request_lenient_history() {
        let request: ChatRequest = serde_json::from_str(
            r#"{"message": "lapor sampah", "history": [{"role": "USER", "text": "hai"}, 7]}"#,
        )
        .expect("request should parse");

        assert_eq!(request.message, "lapor sampah");
        assert_eq!(request.history, vec![HistoryTurn::new(Role::User, "hai")]);
    }

    #[test]
    fn test_chat_request_defaults() {
        let request: ChatRequest = serde_json::from_str("{}").expect("request should parse");
        assert!(request.message.is_empty());
        assert!(request.history.is_empty());

        let request: ChatRequest =
            serde_json::from_str(r#"{"history": "bukan list"}"#).expect("request should parse");
        assert!(request.history.is_empty());
    }

    #[test]
    fn test_failure_serialization() {
        let failure = ChatFailure::rejected("Pesan kosong");
        assert_eq!(
            serde_json::to_value(&failure).expect("serialize"),
            json!({"message": "Pesan kosong"})
        );

        let failure = ChatFailure::failed("Gagal memproses chat RAG", "Not found: kb.txt");
        assert_eq!(
            serde_json::to_value(&failure).expect("serialize"),
            json!({"message": "Gagal memproses chat RAG", "detail": "Not found: kb.txt"})
        );
        assert!(!failure.is_rejected());
    }

    #[test]
    fn test_history_turn_validation() {
        assert!(HistoryTurn::new(Role::User, "").validate().is_err());
        assert!(HistoryTurn::new(Role::User, "ok").validate().is_ok());
    }
}
