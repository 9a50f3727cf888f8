//! Backdrop entry point.
//!
//! Binary name: `backdrop`
//!
//! Loads `.env`, parses flags, validates the configuration (refusing to start
//! on any problem), prepares the work directory, then long-polls Telegram
//! until Ctrl+C or SIGTERM.

mod cli;
mod state;
mod telegram;

use anyhow::Context;
use clap::Parser;

use backdrop_infra::config::{load_bot_config, validate_settings};
use backdrop_infra::filesystem::prepare_work_dir;
use cli::Cli;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    backdrop_observe::init_tracing(&cli.log_options())
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;

    // Flush OTel spans before exit (no-op if OTel was not enabled)
    backdrop_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_bot_config(cli.config.as_deref())
        .await
        .context("failed to load bot config")?;

    let check_only = cli.check;
    let settings = validate_settings(cli.into_settings(config))
        .context("refusing to start with an invalid configuration")?;

    if check_only {
        println!("Configuration OK");
        for background in settings.catalog.iter() {
            println!("  {} -> {}", background.label, background.path.display());
        }
        println!("  rembg: {}", settings.rembg_url);
        println!("  work dir: {}", settings.work_dir.display());
        return Ok(());
    }

    prepare_work_dir(&settings.work_dir)
        .await
        .with_context(|| format!("failed to prepare work dir {}", settings.work_dir.display()))?;

    tracing::info!(
        backgrounds = settings.catalog.len(),
        rembg = %settings.rembg_url,
        max_jobs = settings.max_concurrent_jobs,
        "Backdrop starting"
    );

    let state = AppState::init(settings)?;
    telegram::run_dispatcher(state, shutdown_signal()).await;

    tracing::info!("Backdrop stopped");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
