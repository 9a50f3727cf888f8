//! Chat and message identifiers for Backdrop.
//!
//! These are opaque handles handed out by the messaging gateway. Backdrop never
//! interprets them beyond equality and hashing: `ChatId` keys the session store,
//! `MessageId` lets handlers reply to a specific user message.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Identifier of a conversation on the messaging gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a single message within a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i32);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reply keyboard offered alongside an outgoing text message.
///
/// Each inner vector is one row of buttons; pressing a button sends its label
/// back to the bot as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<String>>,
}

impl ReplyKeyboard {
    /// Build a keyboard with all labels on a single row.
    pub fn single_row<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: vec![labels.into_iter().map(Into::into).collect()],
        }
    }

    /// Iterate over every button label, row by row.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_id_display() {
        assert_eq!(ChatId(-100123).to_string(), "-100123");
    }

    #[test]
    fn test_chat_id_serde_transparent() {
        let json = serde_json::to_string(&ChatId(42)).unwrap();
        assert_eq!(json, "42");
        let parsed: ChatId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, ChatId(42));
    }

    #[test]
    fn test_single_row_keyboard() {
        let keyboard = ReplyKeyboard::single_row(["White ⬜", "Black ⬛"]);
        assert_eq!(keyboard.rows.len(), 1);
        assert_eq!(
            keyboard.labels().collect::<Vec<_>>(),
            vec!["White ⬜", "Black ⬛"]
        );
    }
}
