//! Session store for per-chat background selections.
//!
//! One entry per chat that has picked a background. Entries live for the
//! whole process lifetime and are never evicted; growth is bounded only by
//! the number of distinct chats the bot ever talks to.

use backdrop_types::background::Background;
use backdrop_types::chat::ChatId;
use dashmap::DashMap;

/// Concurrent chat -> selected background table.
///
/// Safe to share across handler tasks; the gateway dispatcher may run
/// handlers for different chats at the same time.
#[derive(Default)]
pub struct SessionStore {
    selections: DashMap<ChatId, Background>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `background` as the selection for `chat_id`.
    ///
    /// Last write wins. Returns the previous selection, if any.
    pub fn select(&self, chat_id: ChatId, background: Background) -> Option<Background> {
        self.selections.insert(chat_id, background)
    }

    /// The current selection for `chat_id`.
    pub fn selected(&self, chat_id: ChatId) -> Option<Background> {
        self.selections.get(&chat_id).map(|entry| entry.value().clone())
    }

    /// Number of chats with a selection.
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("chats", &self.selections.len())
            .finish()
    }
}
