//! Application state wiring the bot service to its concrete adapters.
//!
//! `BackdropBot` is generic over the gateway and model ports; AppState pins
//! it to the Telegram and rembg implementations.

use std::sync::Arc;

use anyhow::Context;
use backdrop_core::imaging::ImagePipeline;
use backdrop_core::service::BackdropBot;
use backdrop_infra::config::ValidatedSettings;
use backdrop_infra::rembg::RembgRemover;
use backdrop_infra::telegram::TelegramGateway;

pub type ConcreteBot = BackdropBot<TelegramGateway, RembgRemover>;

/// Shared state handed to every dispatcher handler.
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<ConcreteBot>,
}

impl AppState {
    /// Build the adapters and the bot service from validated settings.
    pub fn init(settings: ValidatedSettings) -> anyhow::Result<Self> {
        let gateway = TelegramGateway::new(&settings.token);
        let remover = RembgRemover::new(
            &settings.rembg_url,
            settings.rembg_timeout,
            settings.rembg_model,
        )
        .context("failed to create rembg client")?;
        let pipeline = ImagePipeline::new(settings.work_dir, settings.max_concurrent_jobs);

        let bot = BackdropBot::new(gateway, remover, settings.catalog, settings.texts, pipeline);
        Ok(Self { bot: Arc::new(bot) })
    }
}
