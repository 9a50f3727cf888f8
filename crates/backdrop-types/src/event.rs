//! Inbound chat events.
//!
//! The gateway adapter converts whatever its SDK delivers into an
//! [`InboundEvent`]. Everything downstream (router, handlers, pipeline)
//! only ever sees these types.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatId, MessageId};

/// One resolution variant of an uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoVariant {
    /// Gateway file handle used to download the bytes.
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    /// Size in bytes, when the gateway reports it.
    pub file_size: Option<u32>,
}

impl PhotoVariant {
    /// Pixel area of this variant.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Content carried by an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventContent {
    /// A bot command such as `/start` (name stored without the slash or `@bot` suffix).
    Command { name: String, args: String },
    /// Plain text that is not a command.
    Text { text: String },
    /// A photo with one or more resolution variants.
    Photo { variants: Vec<PhotoVariant> },
    /// Anything else (stickers, documents, voice, ...).
    Other,
}

/// A message delivered by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub content: EventContent,
}

impl InboundEvent {
    pub fn new(chat_id: ChatId, message_id: MessageId, content: EventContent) -> Self {
        Self {
            chat_id,
            message_id,
            content,
        }
    }
}

/// Parse raw message text into command or plain-text content.
///
/// `/start`, `/start@backdrop_bot` and `/start extra words` all yield the
/// `start` command. A lone `/` or text not starting with `/` is plain text.
pub fn parse_text(text: &str) -> EventContent {
    if let Some(rest) = text.strip_prefix('/') {
        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (rest, ""),
        };
        let name = head.split('@').next().unwrap_or(head);
        if !name.is_empty() {
            return EventContent::Command {
                name: name.to_string(),
                args: args.to_string(),
            };
        }
    }

    EventContent::Text {
        text: text.to_string(),
    }
}
