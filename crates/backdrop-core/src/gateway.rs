//! ChatGateway trait definition.
//!
//! The outbound half of the messaging SDK. Inbound delivery is the
//! dispatcher's job (see `backdrop-api`); handlers only ever talk to the
//! gateway through this trait.

use std::path::Path;

use backdrop_types::chat::{ChatId, MessageId, ReplyKeyboard};
use backdrop_types::error::GatewayError;

/// Trait for messaging gateway backends (Telegram, test doubles).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in backdrop-infra (e.g., `TelegramGateway`).
pub trait ChatGateway: Send + Sync {
    /// Send a text message, optionally with a reply keyboard.
    fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;

    /// Send a text message as a reply to `reply_to`.
    fn reply_text(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;

    /// Upload the image at `path` as a photo message.
    fn send_photo(
        &self,
        chat_id: ChatId,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;

    /// Download the file behind `file_id` into `dest`, creating or truncating it.
    fn download_file(
        &self,
        file_id: &str,
        dest: &Path,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;
}
