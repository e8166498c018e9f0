// ABOUTME: Wire format of the real-time channel: outbound JSON frames and inbound parsing.
// ABOUTME: Inbound frames that are not structured JSON degrade to their raw text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::SessionId;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    Customer,
    Agent,
}

/// One chat message, created on send or on receipt and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender_type: SenderType,
    pub content: String,
    pub session_id: SessionId,
}

impl ChatMessage {
    pub fn customer(session_id: SessionId, content: impl Into<String>) -> Self {
        Self {
            sender_type: SenderType::Customer,
            content: content.into(),
            session_id,
        }
    }
}

/// Outbound text frame: `{chat_session_id, sender_type, content}`.
#[derive(Debug, Serialize)]
struct OutboundFrame<'a> {
    chat_session_id: &'a str,
    sender_type: SenderType,
    content: &'a str,
}

/// Serialize a message into the outbound frame text.
pub fn encode_outbound(message: &ChatMessage) -> serde_json::Result<String> {
    serde_json::to_string(&OutboundFrame {
        chat_session_id: message.session_id.as_str(),
        sender_type: message.sender_type,
        content: &message.content,
    })
}

/// Turn an inbound frame into a display message.
///
/// Content comes from a non-empty string `content` field; anything else
/// (non-JSON, non-object, missing or empty content) shows the raw frame text.
/// `sender_type: "customer"` marks a relayed customer message, every other
/// value is treated as the agent side.
pub fn decode_inbound(raw: &str, session_id: &SessionId) -> ChatMessage {
    let parsed = serde_json::from_str::<Value>(raw).ok();

    let sender_type = match parsed
        .as_ref()
        .and_then(|v| v.get("sender_type"))
        .and_then(Value::as_str)
    {
        Some("customer") => SenderType::Customer,
        _ => SenderType::Agent,
    };

    let content = parsed
        .as_ref()
        .and_then(|v| v.get("content"))
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .unwrap_or(raw)
        .to_string();

    ChatMessage {
        sender_type,
        content,
        session_id: session_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sid() -> SessionId {
        SessionId::new("abc123")
    }

    #[test]
    fn outbound_frame_matches_wire_schema() {
        let msg = ChatMessage::customer(sid(), "hello");
        let text = encode_outbound(&msg).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({
                "chat_session_id": "abc123",
                "sender_type": "customer",
                "content": "hello"
            })
        );
    }

    #[test]
    fn outbound_frame_escapes_content() {
        let msg = ChatMessage::customer(sid(), "say \"hi\"\nnow");
        let text = encode_outbound(&msg).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["content"], "say \"hi\"\nnow");
    }

    #[test]
    fn structured_frame_uses_content() {
        let msg = decode_inbound(r#"{"content":"Hi, how can I help?"}"#, &sid());
        assert_eq!(msg.content, "Hi, how can I help?");
        assert_eq!(msg.sender_type, SenderType::Agent);
        assert_eq!(msg.session_id, sid());
    }

    #[test]
    fn relayed_customer_frame_is_tagged_customer() {
        let msg = decode_inbound(
            r#"{"chat_session_id":7,"sender_type":"customer","content":"hello"}"#,
            &sid(),
        );
        assert_eq!(msg.sender_type, SenderType::Customer);
        assert_eq!(msg.content, "hello");
    }

    #[test]
    fn unknown_sender_type_is_agent() {
        let msg = decode_inbound(r#"{"sender_type":"bot","content":"auto reply"}"#, &sid());
        assert_eq!(msg.sender_type, SenderType::Agent);
    }

    #[test]
    fn non_json_frame_falls_back_to_raw_text() {
        let msg = decode_inbound("ping", &sid());
        assert_eq!(msg.content, "ping");
        assert_eq!(msg.sender_type, SenderType::Agent);
    }

    #[test]
    fn json_without_content_falls_back_to_raw_text() {
        let raw = r#"{"type":"typing"}"#;
        assert_eq!(decode_inbound(raw, &sid()).content, raw);

        let raw = r#"{"content":""}"#;
        assert_eq!(decode_inbound(raw, &sid()).content, raw);

        let raw = r#"{"content":5}"#;
        assert_eq!(decode_inbound(raw, &sid()).content, raw);

        assert_eq!(decode_inbound("42", &sid()).content, "42");
    }
}
