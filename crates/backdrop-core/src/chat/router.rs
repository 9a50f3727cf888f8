//! Inbound event classification.
//!
//! Maps every `InboundEvent` onto exactly one `Route`. The three handled
//! shapes are mutually exclusive: a command, text equal to a catalog label,
//! or a photo. Everything else is `Route::Unhandled`.

use backdrop_types::background::{Background, BackgroundCatalog};
use backdrop_types::event::{EventContent, InboundEvent, PhotoVariant};

/// Command that opens the conversation.
pub const START_COMMAND: &str = "start";

/// Where an inbound event should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `/start` -- greet and offer the background keyboard.
    Start,
    /// Text exactly matching a catalog label.
    BackgroundChoice(&'a Background),
    /// A photo, with all the resolution variants the gateway supplied.
    PhotoUpload(&'a [PhotoVariant]),
    /// Anything else. Ignored without a reply.
    Unhandled,
}

/// Classify `event` against `catalog`.
pub fn classify<'a>(event: &'a InboundEvent, catalog: &'a BackgroundCatalog) -> Route<'a> {
    match &event.content {
        EventContent::Command { name, .. } if name == START_COMMAND => Route::Start,
        EventContent::Command { .. } => Route::Unhandled,
        EventContent::Text { text } => match catalog.lookup(text) {
            Some(background) => Route::BackgroundChoice(background),
            None => Route::Unhandled,
        },
        EventContent::Photo { variants } => Route::PhotoUpload(variants),
        EventContent::Other => Route::Unhandled,
    }
}
