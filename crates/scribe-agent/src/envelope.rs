//! Chat protocol envelopes.
//!
//! A [`ChatMessage`] carries zero or more typed content items; replies carry
//! a text item followed by an end-of-session marker. A
//! [`ChatAcknowledgement`] references the id of the message it acknowledges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One typed content item. Unrecognized types deserialize to `Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChatContent {
    Text { text: String },
    StartSession,
    EndSession,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub timestamp: DateTime<Utc>,
    pub msg_id: Uuid,
    #[serde(default)]
    pub content: Vec<ChatContent>,
}

impl ChatMessage {
    /// New message stamped now with a fresh id.
    pub fn new(content: Vec<ChatContent>) -> Self {
        Self {
            timestamp: Utc::now(),
            msg_id: Uuid::new_v4(),
            content,
        }
    }

    /// Final reply: `text` followed by the end-of-session marker.
    pub fn reply(text: impl Into<String>) -> Self {
        Self::new(vec![
            ChatContent::Text { text: text.into() },
            ChatContent::EndSession,
        ])
    }

    /// All text items concatenated in order.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|item| match item {
                ChatContent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn ends_session(&self) -> bool {
        self.content.contains(&ChatContent::EndSession)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAcknowledgement {
    pub timestamp: DateTime<Utc>,
    pub acknowledged_msg_id: Uuid,
}

impl ChatAcknowledgement {
    pub fn for_message(msg: &ChatMessage) -> Self {
        Self {
            timestamp: Utc::now(),
            acknowledged_msg_id: msg.msg_id,
        }
    }
}

/// Either kind of envelope, distinguished by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    Message(ChatMessage),
    Acknowledgement(ChatAcknowledgement),
}
