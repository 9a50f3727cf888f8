//! TelegramGateway -- [`ChatGateway`] over the Telegram Bot API.

use std::path::Path;

use backdrop_core::gateway::ChatGateway;
use backdrop_types::chat::{ChatId, MessageId, ReplyKeyboard};
use backdrop_types::error::GatewayError;
use secrecy::{ExposeSecret, SecretString};
use teloxide::Bot;
use teloxide::net::Download;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::Requester;
use teloxide::types::{
    ChatId as TgChatId, FileId, InputFile, KeyboardButton, KeyboardMarkup,
    MessageId as TgMessageId, ReplyParameters,
};
use tokio::io::AsyncWriteExt;

/// Outbound Telegram client.
///
/// Cheap to clone; the underlying `Bot` shares one HTTP client.
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(token: &SecretString) -> Self {
        Self {
            bot: Bot::new(token.expose_secret()),
        }
    }

    /// The underlying teloxide bot, for wiring up the update dispatcher.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

/// Build a Telegram reply keyboard: one button per label, resized to fit.
pub fn keyboard_markup(keyboard: &ReplyKeyboard) -> KeyboardMarkup {
    KeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|label| KeyboardButton::new(label.clone()))
            .collect::<Vec<_>>()
    }))
    .resize_keyboard()
}

fn request_error(err: impl std::fmt::Display) -> GatewayError {
    GatewayError::Request(err.to_string())
}

impl ChatGateway for TelegramGateway {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> Result<(), GatewayError> {
        let request = self.bot.send_message(TgChatId(chat_id.0), text);
        let sent = match keyboard {
            Some(keyboard) => request.reply_markup(keyboard_markup(keyboard)).await,
            None => request.await,
        };
        sent.map_err(request_error)?;
        Ok(())
    }

    async fn reply_text(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        text: &str,
    ) -> Result<(), GatewayError> {
        self.bot
            .send_message(TgChatId(chat_id.0), text)
            .reply_parameters(ReplyParameters::new(TgMessageId(reply_to.0)))
            .await
            .map_err(request_error)?;
        Ok(())
    }

    async fn send_photo(&self, chat_id: ChatId, path: &Path) -> Result<(), GatewayError> {
        self.bot
            .send_photo(TgChatId(chat_id.0), InputFile::file(path.to_path_buf()))
            .await
            .map_err(request_error)?;
        Ok(())
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), GatewayError> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .map_err(|e| GatewayError::Download(format!("get_file '{file_id}': {e}")))?;

        let mut dst = tokio::fs::File::create(dest).await?;
        self.bot
            .download_file(&file.path, &mut dst)
            .await
            .map_err(|e| GatewayError::Download(e.to_string()))?;
        dst.flush().await?;

        tracing::debug!(bytes = file.size, "Downloaded {file_id} to {}", dest.display());
        Ok(())
    }
}
