//! Bot configuration types for Backdrop.
//!
//! `BotConfig` represents the optional `backdrop.toml` that extends the
//! background catalog and overrides user-facing reply texts.

use serde::{Deserialize, Serialize};

use crate::background::Background;

/// Top-level configuration file contents.
///
/// Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Extra backgrounds, appended after the ones given on the command line.
    pub backgrounds: Vec<Background>,

    /// Reply texts sent to users.
    pub texts: ReplyTexts,
}

/// Every message the bot sends on its own initiative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyTexts {
    /// First message after `/start`.
    pub greeting: String,
    /// Second message after `/start`, carrying the background keyboard.
    pub choose_background: String,
    /// Confirmation after a background pick. `{name}` is replaced by the
    /// background's display name.
    pub background_selected: String,
    /// Sent when a photo arrives before any background was picked.
    pub select_background_first: String,
    /// Acknowledgment sent before the pipeline runs.
    pub processing: String,
    /// Generic apology when processing fails.
    pub failure: String,
}

impl Default for ReplyTexts {
    fn default() -> Self {
        Self {
            greeting: "Hi! I'm a bot 👋\nSend me a photo and I'll remove its background!"
                .to_string(),
            choose_background: "But first, pick a background to put behind you 🤔".to_string(),
            background_selected: "You picked the {name} background.\nNow send me a photo."
                .to_string(),
            select_background_first: "Please pick a background first.".to_string(),
            processing: "Processing your image...\nPlease wait 💤".to_string(),
            failure: "Something went wrong while processing your image 😢".to_string(),
        }
    }
}

impl ReplyTexts {
    /// Render the selection confirmation for a background display name.
    pub fn background_selected_for(&self, name: &str) -> String {
        self.background_selected.replace("{name}", name)
    }
}
