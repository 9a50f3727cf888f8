//! Background fitting and alpha compositing.
//!
//! The background is stretched (not cropped) to the foreground's exact pixel
//! dimensions, so the aspect ratio of the background image is not preserved.
//! The foreground is then blended over it with the standard "over" operator,
//! weighting each channel by the foreground's alpha. The background is treated
//! as opaque, so the result is always fully opaque.
//!
//! All arithmetic is integer-only, which keeps the output byte-for-byte
//! identical for identical inputs.

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, RgbaImage};

/// Resampling filter used to stretch backgrounds (bicubic).
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Stretch `background` to exactly `width` x `height` and drop its alpha channel.
pub fn fit_background(background: &DynamicImage, width: u32, height: u32) -> RgbImage {
    if width == 0 || height == 0 {
        return RgbImage::new(width, height);
    }
    if background.width() == width && background.height() == height {
        return background.to_rgb8();
    }
    background.resize_exact(width, height, RESIZE_FILTER).to_rgb8()
}

/// Blend `foreground` over an already-fitted opaque `background`.
///
/// Both images must have the same dimensions.
pub fn blend_over(foreground: &RgbaImage, background: &RgbImage) -> RgbImage {
    debug_assert_eq!(foreground.dimensions(), background.dimensions());

    let (width, height) = foreground.dimensions();
    let mut out = RgbImage::new(width, height);

    for ((dst, fg), bg) in out
        .pixels_mut()
        .zip(foreground.pixels())
        .zip(background.pixels())
    {
        let alpha = u32::from(fg[3]);
        let inverse = 255 - alpha;
        for channel in 0..3 {
            let value = u32::from(fg[channel]) * alpha + u32::from(bg[channel]) * inverse;
            // Rounded division by 255; never exceeds 255.
            dst[channel] = ((value + 127) / 255) as u8;
        }
    }

    out
}

/// Composite `foreground` onto `background`.
///
/// The output always has the foreground's dimensions, whatever the
/// background's dimensions are.
pub fn composite(foreground: &RgbaImage, background: &DynamicImage) -> RgbImage {
    let (width, height) = foreground.dimensions();
    let fitted = fit_background(background, width, height);
    blend_over(foreground, &fitted)
}
