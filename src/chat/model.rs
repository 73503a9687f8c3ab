//! Chat data model: messages and conversation events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;

/// Content used for an image-only message.
pub const IMAGE_PLACEHOLDER: &str = "Image";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The customer who opened the chat.
    Customer,
    /// The worker being contacted.
    Worker,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Worker => write!(f, "worker"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
}

/// One entry in a conversation. Messages are never edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Per-conversation sequence number; strictly increasing in insertion order.
    pub id: u64,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Attachment>,
}

impl Message {
    /// `HH:MM` for the message bubble.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Events broadcast to whoever renders the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message was appended to the log.
    MessageAppended { message: Message },
    /// The worker started or stopped "typing".
    Typing { active: bool },
    /// The conversation was closed; no further events follow.
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_type_tag() {
        let json = serde_json::to_value(ChatEvent::Typing { active: true }).unwrap();
        assert_eq!(json["type"], "typing");
        assert_eq!(json["active"], true);

        let json = serde_json::to_value(ChatEvent::Closed).unwrap();
        assert_eq!(json["type"], "closed");
    }

    #[test]
    fn text_message_omits_image() {
        let msg = Message {
            id: 1,
            content: "hello".into(),
            sender: Sender::Customer,
            timestamp: Utc::now(),
            kind: MessageKind::Text,
            image: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "customer");
        assert_eq!(json["kind"], "text");
        assert!(json.get("image").is_none());
        assert_eq!(msg.time_label().len(), 5);
    }
}
