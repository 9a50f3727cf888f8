//! Photo pipeline: download -> remove background -> composite -> send.
//!
//! Each run owns a fresh [`RequestWorkspace`]; the workspace is removed on
//! every exit path. Decoding, compositing and encoding are CPU-bound and run
//! on the blocking pool. A semaphore caps how many jobs run at once so a burst
//! of uploads cannot pile unbounded work onto the model.

use std::path::{Path, PathBuf};
use std::time::Instant;

use backdrop_types::background::Background;
use backdrop_types::chat::ChatId;
use backdrop_types::error::PipelineError;
use backdrop_types::event::PhotoVariant;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, info, info_span, warn};

use super::composite::composite;
use super::remover::BackgroundRemover;
use super::workspace::RequestWorkspace;
use crate::gateway::ChatGateway;

/// Default number of photo jobs allowed to run at the same time.
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 4;

/// Pick the highest-resolution variant.
///
/// Largest pixel area wins; on ties the later variant wins, matching the
/// gateway convention of listing variants smallest first.
pub fn largest_variant(variants: &[PhotoVariant]) -> Option<&PhotoVariant> {
    variants.iter().max_by_key(|v| v.area())
}

/// Runs photo jobs inside per-request workspaces under `work_dir`.
pub struct ImagePipeline {
    work_dir: PathBuf,
    jobs: Semaphore,
}

impl ImagePipeline {
    /// Create a pipeline writing temp artifacts under `work_dir`.
    ///
    /// `max_concurrent_jobs` is clamped to at least 1.
    pub fn new(work_dir: PathBuf, max_concurrent_jobs: usize) -> Self {
        Self {
            work_dir,
            jobs: Semaphore::new(max_concurrent_jobs.max(1)),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Process one uploaded photo and send the composite back to `chat_id`.
    pub async fn run<G, R>(
        &self,
        gateway: &G,
        remover: &R,
        chat_id: ChatId,
        variants: &[PhotoVariant],
        background: &Background,
    ) -> Result<(), PipelineError>
    where
        G: ChatGateway,
        R: BackgroundRemover,
    {
        let variant = largest_variant(variants).ok_or(PipelineError::NoPhoto)?;

        let _permit = self
            .jobs
            .acquire()
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))?;

        let workspace = RequestWorkspace::create(&self.work_dir)?;
        let span = info_span!(
            "backdrop.photo",
            chat.id = %chat_id,
            request.id = %workspace.request_id(),
            background = %background.label,
            model = remover.name(),
        );

        let result = Self::process(gateway, remover, chat_id, variant, background, &workspace)
            .instrument(span.clone())
            .await;

        let dir = workspace.path().to_path_buf();
        if let Err(e) = workspace.close() {
            span.in_scope(|| warn!(dir = %dir.display(), "failed to remove request workspace: {e}"));
        }

        result
    }

    async fn process<G, R>(
        gateway: &G,
        remover: &R,
        chat_id: ChatId,
        variant: &PhotoVariant,
        background: &Background,
        workspace: &RequestWorkspace,
    ) -> Result<(), PipelineError>
    where
        G: ChatGateway,
        R: BackgroundRemover,
    {
        let started = Instant::now();

        let input_path = workspace.input_path();
        gateway
            .download_file(&variant.file_id, &input_path)
            .await
            .map_err(PipelineError::Download)?;
        debug!(
            width = variant.width,
            height = variant.height,
            "photo downloaded"
        );

        let photo = decode_photo(input_path).await?;
        let foreground = remover.remove_background(photo).await?;
        debug!(
            width = foreground.width(),
            height = foreground.height(),
            "background removed"
        );

        let result_path = workspace.result_path();
        render_result(foreground, background.path.clone(), result_path.clone()).await?;

        gateway
            .send_photo(chat_id, &result_path)
            .await
            .map_err(PipelineError::Send)?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "photo processed"
        );
        Ok(())
    }
}

impl std::fmt::Debug for ImagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePipeline")
            .field("work_dir", &self.work_dir)
            .field("available_slots", &self.jobs.available_permits())
            .finish()
    }
}

/// Decode the downloaded photo, sniffing the format from its bytes.
async fn decode_photo(path: PathBuf) -> Result<DynamicImage, PipelineError> {
    tokio::task::spawn_blocking(move || {
        let reader = ImageReader::open(&path)?.with_guessed_format()?;
        reader
            .decode()
            .map_err(|e| PipelineError::Decode(e.to_string()))
    })
    .await
    .map_err(|e| PipelineError::Task(e.to_string()))?
}

/// Open a background image, sniffing the format from its contents.
///
/// The file extension is ignored.
fn load_background(path: &Path) -> Result<DynamicImage, image::ImageError> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}

/// Load the background, composite, and write the result as PNG.
async fn render_result(
    foreground: RgbaImage,
    background_path: PathBuf,
    result_path: PathBuf,
) -> Result<(), PipelineError> {
    tokio::task::spawn_blocking(move || {
        let background =
            load_background(&background_path).map_err(|e| PipelineError::Background {
                path: background_path.clone(),
                message: e.to_string(),
            })?;

        composite(&foreground, &background)
            .save_with_format(&result_path, ImageFormat::Png)
            .map_err(|e| PipelineError::Encode(e.to_string()))
    })
    .await
    .map_err(|e| PipelineError::Task(e.to_string()))?
}
