//! CLI definition for the `backdrop` binary.
//!
//! Every setting can come from a flag or its environment variable; a `.env`
//! file in the working directory is loaded before parsing.

use std::path::PathBuf;
use std::time::Duration;

use backdrop_core::imaging::pipeline::DEFAULT_MAX_CONCURRENT_JOBS;
use backdrop_infra::config::Settings;
use backdrop_infra::filesystem::resolve_work_dir;
use backdrop_observe::LogOptions;
use backdrop_types::background::Background;
use backdrop_types::config::BotConfig;
use clap::Parser;
use secrecy::SecretString;

/// Keyboard label for `--white-background`.
pub const WHITE_LABEL: &str = "White ⬜";
/// Keyboard label for `--black-background`.
pub const BLACK_LABEL: &str = "Black ⬛";

/// Telegram bot that swaps photo backgrounds.
#[derive(Parser, Debug)]
#[command(name = "backdrop", version, about, long_about = None)]
pub struct Cli {
    /// Telegram bot token.
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Image used for the "White ⬜" option.
    #[arg(long, env = "BACKGROUND_IMAGE_WHITE")]
    pub white_background: Option<PathBuf>,

    /// Image used for the "Black ⬛" option.
    #[arg(long, env = "BACKGROUND_IMAGE_BLACK")]
    pub black_background: Option<PathBuf>,

    /// TOML file with extra backgrounds and reply texts.
    #[arg(long, env = "BACKDROP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for per-request temp files (default: platform cache dir).
    #[arg(long, env = "BACKDROP_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Base URL of the rembg server.
    #[arg(long, env = "REMBG_URL", default_value = "http://127.0.0.1:7000")]
    pub rembg_url: String,

    /// rembg model name (server default when unset).
    #[arg(long, env = "REMBG_MODEL")]
    pub rembg_model: Option<String>,

    /// Timeout for one background-removal request, in seconds.
    #[arg(long, env = "REMBG_TIMEOUT_SECS", default_value_t = 120)]
    pub rembg_timeout_secs: u64,

    /// Photos processed at the same time across all chats.
    #[arg(long, env = "BACKDROP_MAX_JOBS", default_value_t = DEFAULT_MAX_CONCURRENT_JOBS)]
    pub max_concurrent_jobs: usize,

    /// Validate configuration and exit.
    #[arg(long)]
    pub check: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long)]
    pub otel: bool,

    /// Only log warnings and errors.
    #[arg(long)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            verbosity: self.verbose,
            quiet: self.quiet,
            json: self.log_json,
            otel: self.otel,
        }
    }

    /// Merge flags with the config file into unvalidated [`Settings`].
    ///
    /// Backgrounds from the config file come first, then the white and black
    /// flag backgrounds, in that order.
    pub fn into_settings(self, config: BotConfig) -> Settings {
        let mut backgrounds = config.backgrounds;
        if let Some(path) = self.white_background {
            backgrounds.push(Background::new(WHITE_LABEL, path));
        }
        if let Some(path) = self.black_background {
            backgrounds.push(Background::new(BLACK_LABEL, path));
        }

        Settings {
            token: SecretString::from(self.token.unwrap_or_default()),
            backgrounds,
            work_dir: resolve_work_dir(self.work_dir),
            rembg_url: self.rembg_url,
            rembg_timeout: Duration::from_secs(self.rembg_timeout_secs),
            rembg_model: self.rembg_model,
            max_concurrent_jobs: self.max_concurrent_jobs,
            texts: config.texts,
        }
    }
}
