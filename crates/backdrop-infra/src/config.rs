//! Configuration loading and startup validation for Backdrop.
//!
//! Raw settings come from CLI flags / environment (parsed in `backdrop-api`)
//! plus an optional `backdrop.toml` ([`BotConfig`]). Everything is checked
//! once at startup by [`validate_settings`]; every problem found is reported
//! together and the process refuses to start.

use std::path::{Path, PathBuf};
use std::time::Duration;

use backdrop_types::background::{Background, BackgroundCatalog};
use backdrop_types::config::{BotConfig, ReplyTexts};
use backdrop_types::error::ConfigError;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// Settings as provided by the operator, before validation.
pub struct Settings {
    pub token: SecretString,
    /// Backgrounds in the order they should appear on the keyboard.
    pub backgrounds: Vec<Background>,
    pub work_dir: PathBuf,
    pub rembg_url: String,
    pub rembg_timeout: Duration,
    /// rembg model name (e.g., "u2net", "isnet-general-use"). Server default when `None`.
    pub rembg_model: Option<String>,
    pub max_concurrent_jobs: usize,
    pub texts: ReplyTexts,
}

/// Settings that passed [`validate_settings`].
///
/// Does not derive Debug: the token must never reach a log line.
pub struct ValidatedSettings {
    pub token: SecretString,
    pub catalog: BackgroundCatalog,
    pub work_dir: PathBuf,
    pub rembg_url: Url,
    pub rembg_timeout: Duration,
    pub rembg_model: Option<String>,
    pub max_concurrent_jobs: usize,
    pub texts: ReplyTexts,
}

/// Load `BotConfig` from `path`.
///
/// - `None` returns [`BotConfig::default()`].
/// - An explicit path that cannot be read or parsed is an error.
pub async fn load_bot_config(path: Option<&Path>) -> Result<BotConfig, ConfigError> {
    let Some(path) = path else {
        tracing::debug!("No config file given, using defaults");
        return Ok(BotConfig::default());
    };

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    toml::from_str::<BotConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Check every setting and build the background catalog.
///
/// Collects all problems instead of stopping at the first one.
pub fn validate_settings(settings: Settings) -> Result<ValidatedSettings, ConfigError> {
    let mut problems = Vec::new();

    if settings.token.expose_secret().trim().is_empty() {
        problems.push("bot token is empty (set TELEGRAM_TOKEN or --token)".to_string());
    }

    for background in &settings.backgrounds {
        if !background.path.is_file() {
            problems.push(format!(
                "background '{}' image not found at '{}'",
                background.label,
                background.path.display()
            ));
            continue;
        }
        match decode_background(&background.path) {
            Ok((width, height)) => tracing::debug!(
                label = %background.label,
                width,
                height,
                "Background image checked"
            ),
            Err(err) => problems.push(format!(
                "background '{}' at '{}' is not a readable image: {err}",
                background.label,
                background.path.display()
            )),
        }
    }

    let catalog = match BackgroundCatalog::new(settings.backgrounds) {
        Ok(catalog) => Some(catalog),
        Err(ConfigError::Invalid(catalog_problems)) => {
            problems.extend(catalog_problems);
            None
        }
        Err(other) => {
            problems.push(other.to_string());
            None
        }
    };

    let rembg_url = match Url::parse(&settings.rembg_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        Ok(url) => {
            problems.push(format!(
                "rembg URL '{}' must use http or https, not '{}'",
                settings.rembg_url,
                url.scheme()
            ));
            None
        }
        Err(err) => {
            problems.push(format!("rembg URL '{}' is invalid: {err}", settings.rembg_url));
            None
        }
    };

    if settings.rembg_timeout.is_zero() {
        problems.push("rembg timeout must be greater than zero".to_string());
    }

    if settings.max_concurrent_jobs == 0 {
        problems.push("max concurrent jobs must be at least 1".to_string());
    }

    if settings.work_dir.exists() && !settings.work_dir.is_dir() {
        problems.push(format!(
            "work dir '{}' exists but is not a directory",
            settings.work_dir.display()
        ));
    }

    match (catalog, rembg_url) {
        (Some(catalog), Some(rembg_url)) if problems.is_empty() => Ok(ValidatedSettings {
            token: settings.token,
            catalog,
            work_dir: settings.work_dir,
            rembg_url,
            rembg_timeout: settings.rembg_timeout,
            rembg_model: settings.rembg_model,
            max_concurrent_jobs: settings.max_concurrent_jobs,
            texts: settings.texts,
        }),
        _ => Err(ConfigError::Invalid(problems)),
    }
}

/// Decode a background image the way the photo pipeline will, returning its size.
fn decode_background(path: &Path) -> Result<(u32, u32), image::ImageError> {
    let decoded = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    Ok((decoded.width(), decoded.height()))
}
