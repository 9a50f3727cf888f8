//! BackgroundRemover trait definition.
//!
//! The segmentation model is a black box: it takes a decoded image and
//! returns the same image with an alpha channel where background pixels are
//! fully transparent. Swapping models means adding another implementation,
//! nothing in the pipeline changes.

use backdrop_types::error::RemovalError;
use image::{DynamicImage, RgbaImage};

/// Trait for background-removal backends (rembg over HTTP, test doubles).
///
/// Implementations live in backdrop-infra (e.g., `RembgRemover`).
pub trait BackgroundRemover: Send + Sync {
    /// Human-readable backend name (e.g., "rembg").
    fn name(&self) -> &str;

    /// Remove the background from `image`.
    ///
    /// The returned image has the same dimensions as the model decided on;
    /// callers must not assume they match the input.
    fn remove_background(
        &self,
        image: DynamicImage,
    ) -> impl std::future::Future<Output = Result<RgbaImage, RemovalError>> + Send;
}
