//! RembgRemover -- concrete [`BackgroundRemover`] backed by a rembg server.
//!
//! Sends the photo as a PNG in a multipart `file` field to `POST /api/remove`
//! and decodes the PNG cutout the server returns.

use std::io::Cursor;
use std::time::{Duration, Instant};

use backdrop_core::imaging::BackgroundRemover;
use backdrop_types::error::RemovalError;
use image::{DynamicImage, ImageFormat, RgbaImage};
use reqwest::multipart::{Form, Part};
use url::Url;

/// Background remover using the rembg HTTP API.
pub struct RembgRemover {
    client: reqwest::Client,
    endpoint: String,
    model: Option<String>,
}

impl RembgRemover {
    const REMOVE_PATH: &'static str = "/api/remove";

    /// Create a remover for the rembg server at `base_url`.
    ///
    /// `timeout` bounds a whole request; model inference on large photos
    /// can take tens of seconds on CPU.
    pub fn new(
        base_url: &Url,
        timeout: Duration,
        model: Option<String>,
    ) -> Result<Self, RemovalError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemovalError::Request(format!("failed to create HTTP client: {e}")))?;

        let endpoint = format!(
            "{}{}",
            base_url.as_str().trim_end_matches('/'),
            Self::REMOVE_PATH
        );

        Ok(Self {
            client,
            endpoint,
            model,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn form(&self, png: Vec<u8>) -> Result<Form, RemovalError> {
        let part = Part::bytes(png)
            .file_name("photo.png")
            .mime_str("image/png")
            .map_err(|e| RemovalError::Encode(e.to_string()))?;

        let form = Form::new().part("file", part);
        Ok(match &self.model {
            Some(model) => form.text("model", model.clone()),
            None => form,
        })
    }
}

/// Encode `image` as PNG off the async runtime.
async fn encode_png(image: DynamicImage) -> Result<Vec<u8>, RemovalError> {
    tokio::task::spawn_blocking(move || {
        let mut buf = Cursor::new(Vec::new());
        image
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| RemovalError::Encode(e.to_string()))?;
        Ok(buf.into_inner())
    })
    .await
    .map_err(|e| RemovalError::Encode(format!("encode task failed: {e}")))?
}

/// Decode the server's cutout off the async runtime.
async fn decode_cutout(bytes: Vec<u8>) -> Result<RgbaImage, RemovalError> {
    tokio::task::spawn_blocking(move || {
        image::load_from_memory(&bytes)
            .map(|decoded| decoded.to_rgba8())
            .map_err(|e| RemovalError::Decode(e.to_string()))
    })
    .await
    .map_err(|e| RemovalError::Decode(format!("decode task failed: {e}")))?
}

impl BackgroundRemover for RembgRemover {
    fn name(&self) -> &str {
        "rembg"
    }

    async fn remove_background(&self, image: DynamicImage) -> Result<RgbaImage, RemovalError> {
        let started = Instant::now();
        let form = self.form(encode_png(image).await?)?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RemovalError::Request(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemovalError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemovalError::Request(format!("failed to read response body: {e}")))?;
        let cutout = decode_cutout(bytes.to_vec()).await?;

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            width = cutout.width(),
            height = cutout.height(),
            "rembg cutout received"
        );
        Ok(cutout)
    }
}
