//! Backdrop bot service.
//!
//! Handles every inbound event: `/start` greets and offers the background
//! keyboard, a catalog label records the chat's choice, and a photo runs the
//! image pipeline against that choice. Events matching none of these are
//! dropped without a reply.

use backdrop_types::background::{Background, BackgroundCatalog};
use backdrop_types::chat::ReplyKeyboard;
use backdrop_types::config::ReplyTexts;
use backdrop_types::error::GatewayError;
use backdrop_types::event::{InboundEvent, PhotoVariant};
use tracing::{debug, error, info};

use crate::chat::router::{Route, classify};
use crate::chat::session::SessionStore;
use crate::gateway::ChatGateway;
use crate::imaging::pipeline::ImagePipeline;
use crate::imaging::remover::BackgroundRemover;

/// Service orchestrating the whole conversation.
///
/// Generic over the gateway and model ports to maintain clean architecture
/// -- backdrop-core never depends on backdrop-infra.
pub struct BackdropBot<G: ChatGateway, R: BackgroundRemover> {
    gateway: G,
    remover: R,
    catalog: BackgroundCatalog,
    texts: ReplyTexts,
    sessions: SessionStore,
    pipeline: ImagePipeline,
}

impl<G: ChatGateway, R: BackgroundRemover> BackdropBot<G, R> {
    /// Create a new bot service.
    ///
    /// - `gateway`: outbound messaging
    /// - `remover`: background-removal model
    /// - `catalog`: backgrounds offered on `/start`
    /// - `texts`: user-facing replies
    /// - `pipeline`: photo job runner (owns the work dir)
    pub fn new(
        gateway: G,
        remover: R,
        catalog: BackgroundCatalog,
        texts: ReplyTexts,
        pipeline: ImagePipeline,
    ) -> Self {
        Self {
            gateway,
            remover,
            catalog,
            texts,
            sessions: SessionStore::new(),
            pipeline,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn catalog(&self) -> &BackgroundCatalog {
        &self.catalog
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Route and handle one inbound event.
    ///
    /// Processing faults are reported to the user and swallowed here; only
    /// failures to talk to the gateway itself are returned.
    pub async fn handle(&self, event: &InboundEvent) -> Result<(), GatewayError> {
        match classify(event, &self.catalog) {
            Route::Start => self.on_start(event).await,
            Route::BackgroundChoice(background) => {
                self.on_background_choice(event, background).await
            }
            Route::PhotoUpload(variants) => self.on_photo(event, variants).await,
            Route::Unhandled => {
                debug!(chat.id = %event.chat_id, "ignoring unhandled event");
                Ok(())
            }
        }
    }

    async fn on_start(&self, event: &InboundEvent) -> Result<(), GatewayError> {
        let keyboard = ReplyKeyboard::single_row(self.catalog.labels());

        self.gateway
            .send_text(event.chat_id, &self.texts.greeting, None)
            .await?;
        self.gateway
            .send_text(event.chat_id, &self.texts.choose_background, Some(&keyboard))
            .await
    }

    async fn on_background_choice(
        &self,
        event: &InboundEvent,
        background: &Background,
    ) -> Result<(), GatewayError> {
        let previous = self.sessions.select(event.chat_id, background.clone());
        info!(
            chat.id = %event.chat_id,
            background = %background.label,
            previous = ?previous.as_ref().map(|b| b.label.as_str()),
            "background selected"
        );

        let confirmation = self
            .texts
            .background_selected_for(background.display_name());
        self.gateway
            .reply_text(event.chat_id, event.message_id, &confirmation)
            .await
    }

    async fn on_photo(
        &self,
        event: &InboundEvent,
        variants: &[PhotoVariant],
    ) -> Result<(), GatewayError> {
        let Some(background) = self.sessions.selected(event.chat_id) else {
            debug!(chat.id = %event.chat_id, "photo received before a background was picked");
            return self
                .gateway
                .reply_text(
                    event.chat_id,
                    event.message_id,
                    &self.texts.select_background_first,
                )
                .await;
        };

        self.gateway
            .reply_text(event.chat_id, event.message_id, &self.texts.processing)
            .await?;

        let outcome = self
            .pipeline
            .run(
                &self.gateway,
                &self.remover,
                event.chat_id,
                variants,
                &background,
            )
            .await;

        if let Err(err) = outcome {
            error!(chat.id = %event.chat_id, error = %err, "photo processing failed");
            self.gateway
                .reply_text(event.chat_id, event.message_id, &self.texts.failure)
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockGateway, MockRemover, Sent, write_png};
    use backdrop_types::chat::{ChatId, MessageId};
    use backdrop_types::event::{EventContent, parse_text};
    use image::Rgb;
    use tempfile::TempDir;

    struct Harness {
        bot: BackdropBot<MockGateway, MockRemover>,
        work: TempDir,
        _assets: TempDir,
    }

    fn harness(gateway: MockGateway, remover: MockRemover) -> Harness {
        let assets = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let catalog = BackgroundCatalog::new(vec![
            Background::new(
                "White ⬜",
                write_png(assets.path(), "white.png", 32, 32, [255, 255, 255]),
            ),
            Background::new(
                "Black ⬛",
                write_png(assets.path(), "black.png", 50, 10, [0, 0, 0]),
            ),
        ])
        .unwrap();
        let pipeline = ImagePipeline::new(work.path().to_path_buf(), 2);
        let bot = BackdropBot::new(gateway, remover, catalog, ReplyTexts::default(), pipeline);

        Harness {
            bot,
            work,
            _assets: assets,
        }
    }

    fn text(chat: i64, msg: i32, body: &str) -> InboundEvent {
        InboundEvent::new(ChatId(chat), MessageId(msg), parse_text(body))
    }

    fn photo(chat: i64, msg: i32) -> InboundEvent {
        InboundEvent::new(
            ChatId(chat),
            MessageId(msg),
            EventContent::Photo {
                variants: vec![
                    PhotoVariant {
                        file_id: "thumb".to_string(),
                        width: 6,
                        height: 4,
                        file_size: Some(100),
                    },
                    PhotoVariant {
                        file_id: "full".to_string(),
                        width: 24,
                        height: 16,
                        file_size: Some(2_000),
                    },
                ],
            },
        )
    }

    fn work_dir_is_empty(h: &Harness) -> bool {
        std::fs::read_dir(h.work.path()).unwrap().count() == 0
    }

    #[tokio::test]
    async fn test_start_sends_greeting_and_keyboard() {
        let h = harness(MockGateway::with_photo(4, 4, [0, 0, 0]), MockRemover::cutout());

        h.bot.handle(&text(1, 10, "/start")).await.unwrap();

        let texts = ReplyTexts::default();
        let sent = h.bot.gateway().sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0],
            Sent::Text {
                chat_id: ChatId(1),
                text: texts.greeting.clone(),
                keyboard: None,
            }
        );
        match &sent[1] {
            Sent::Text { text, keyboard, .. } => {
                assert_eq!(text, &texts.choose_background);
                let keyboard = keyboard.as_ref().unwrap();
                assert_eq!(
                    keyboard.labels().collect::<Vec<_>>(),
                    vec!["White ⬜", "Black ⬛"]
                );
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(h.bot.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_background_choice_confirms_and_overwrites() {
        let h = harness(MockGateway::with_photo(4, 4, [0, 0, 0]), MockRemover::cutout());

        h.bot.handle(&text(1, 11, "White ⬜")).await.unwrap();
        h.bot.handle(&text(1, 12, "Black ⬛")).await.unwrap();

        let selected = h.bot.sessions().selected(ChatId(1)).unwrap();
        assert_eq!(selected.label, "Black ⬛");

        let sent = h.bot.gateway().sent();
        assert_eq!(
            sent[0],
            Sent::Reply {
                chat_id: ChatId(1),
                reply_to: MessageId(11),
                text: ReplyTexts::default().background_selected_for("White"),
            }
        );
        assert_eq!(
            sent[1],
            Sent::Reply {
                chat_id: ChatId(1),
                reply_to: MessageId(12),
                text: ReplyTexts::default().background_selected_for("Black"),
            }
        );
    }

    #[tokio::test]
    async fn test_photo_without_selection_only_guides() {
        let h = harness(MockGateway::with_photo(24, 16, [255, 0, 0]), MockRemover::cutout());

        h.bot.handle(&photo(3, 20)).await.unwrap();

        assert_eq!(
            h.bot.gateway().sent(),
            vec![Sent::Reply {
                chat_id: ChatId(3),
                reply_to: MessageId(20),
                text: ReplyTexts::default().select_background_first,
            }]
        );
        assert!(h.bot.gateway().downloaded_ids().is_empty());
        assert_eq!(h.bot_remover_calls(), 0);
        assert!(work_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_full_conversation() {
        let h = harness(MockGateway::with_photo(24, 16, [255, 0, 0]), MockRemover::cutout());

        h.bot.handle(&text(7, 1, "/start")).await.unwrap();
        h.bot.handle(&text(7, 2, "Black ⬛")).await.unwrap();
        h.bot.handle(&photo(7, 3)).await.unwrap();

        let sent = h.bot.gateway().sent();
        assert_eq!(sent.len(), 5);
        assert_eq!(
            sent[3],
            Sent::Reply {
                chat_id: ChatId(7),
                reply_to: MessageId(3),
                text: ReplyTexts::default().processing,
            }
        );
        match &sent[4] {
            Sent::Photo { chat_id, image } => {
                assert_eq!(*chat_id, ChatId(7));
                assert_eq!(image.dimensions(), (24, 16));
                assert_eq!(*image.get_pixel(0, 8), Rgb([0, 0, 0]));
                assert_eq!(*image.get_pixel(23, 8), Rgb([255, 0, 0]));
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert_eq!(h.bot.gateway().downloaded_ids(), vec!["full".to_string()]);
        assert!(work_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_model_failure_reports_generic_message() {
        let h = harness(MockGateway::with_photo(24, 16, [255, 0, 0]), MockRemover::failing());

        h.bot.handle(&text(9, 1, "White ⬜")).await.unwrap();
        h.bot.handle(&photo(9, 2)).await.unwrap();

        let sent = h.bot.gateway().sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(
            sent[2],
            Sent::Reply {
                chat_id: ChatId(9),
                reply_to: MessageId(2),
                text: ReplyTexts::default().failure,
            }
        );
        assert!(!sent.iter().any(|s| matches!(s, Sent::Photo { .. })));
        assert!(work_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_download_failure_reports_generic_message() {
        let h = harness(MockGateway::failing_download(), MockRemover::cutout());

        h.bot.handle(&text(4, 1, "White ⬜")).await.unwrap();
        h.bot.handle(&photo(4, 2)).await.unwrap();

        let sent = h.bot.gateway().sent();
        assert_eq!(
            sent.last().unwrap(),
            &Sent::Reply {
                chat_id: ChatId(4),
                reply_to: MessageId(2),
                text: ReplyTexts::default().failure,
            }
        );
        assert_eq!(h.bot_remover_calls(), 0);
        assert!(work_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_send_failure_reports_generic_message() {
        let h = harness(
            MockGateway::failing_send(24, 16, [255, 0, 0]),
            MockRemover::cutout(),
        );

        h.bot.handle(&text(6, 1, "Black ⬛")).await.unwrap();
        h.bot.handle(&photo(6, 2)).await.unwrap();

        let texts = ReplyTexts::default();
        let sent = h.bot.gateway().sent();
        assert_eq!(
            &sent[1..],
            &[
                Sent::Reply {
                    chat_id: ChatId(6),
                    reply_to: MessageId(2),
                    text: texts.processing.clone(),
                },
                Sent::Reply {
                    chat_id: ChatId(6),
                    reply_to: MessageId(2),
                    text: texts.failure.clone(),
                },
            ]
        );
        assert_eq!(h.bot_remover_calls(), 1);
        assert!(work_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_unhandled_events_are_silent() {
        let h = harness(MockGateway::with_photo(4, 4, [0, 0, 0]), MockRemover::cutout());

        h.bot.handle(&text(1, 1, "hello")).await.unwrap();
        h.bot.handle(&text(1, 2, "/help")).await.unwrap();
        h.bot
            .handle(&InboundEvent::new(ChatId(1), MessageId(3), EventContent::Other))
            .await
            .unwrap();

        assert!(h.bot.gateway().sent().is_empty());
        assert!(h.bot.sessions().is_empty());
    }

    impl Harness {
        fn bot_remover_calls(&self) -> usize {
            self.bot.remover.calls()
        }
    }
}
