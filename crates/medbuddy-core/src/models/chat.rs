//! Chat message models.

use serde::{Deserialize, Serialize};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single message in a chat session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: Sender, timestamp: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: timestamp.to_rfc3339(),
        }
    }

    pub fn is_from_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}
