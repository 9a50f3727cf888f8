//! Mapping from teloxide messages onto Backdrop's inbound events.

use backdrop_types::chat::{ChatId, MessageId};
use backdrop_types::event::{EventContent, InboundEvent, PhotoVariant, parse_text};
use teloxide::types::{Message, PhotoSize};

pub fn variant_from_photo(photo: &PhotoSize) -> PhotoVariant {
    PhotoVariant {
        file_id: photo.file.id.0.clone(),
        width: photo.width,
        height: photo.height,
        file_size: Some(photo.file.size),
    }
}

/// Classify a Telegram message by content.
///
/// Photos win over captions; anything that is neither a photo nor text
/// (stickers, voice, documents) becomes [`EventContent::Other`].
pub fn event_from_message(msg: &Message) -> InboundEvent {
    let content = if let Some(photos) = msg.photo() {
        EventContent::Photo {
            variants: photos.iter().map(variant_from_photo).collect(),
        }
    } else if let Some(text) = msg.text() {
        parse_text(text)
    } else {
        EventContent::Other
    };

    InboundEvent::new(ChatId(msg.chat.id.0), MessageId(msg.id.0), content)
}
