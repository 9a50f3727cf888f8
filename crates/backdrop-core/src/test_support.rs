//! Test doubles for the gateway and model ports.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use backdrop_types::chat::{ChatId, MessageId, ReplyKeyboard};
use backdrop_types::error::{GatewayError, RemovalError};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};

use crate::gateway::ChatGateway;
use crate::imaging::remover::BackgroundRemover;

/// Everything the mock gateway was asked to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
        keyboard: Option<ReplyKeyboard>,
    },
    Reply {
        chat_id: ChatId,
        reply_to: MessageId,
        text: String,
    },
    Photo {
        chat_id: ChatId,
        image: RgbImage,
    },
}

/// Encode a solid-colour PNG in memory.
pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Write a solid-colour PNG to `dir/name` and return its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(width, height, color)).unwrap();
    path
}

/// In-memory gateway that records outgoing messages.
pub struct MockGateway {
    download: Vec<u8>,
    fail_download: bool,
    fail_send: bool,
    sent: Mutex<Vec<Sent>>,
    downloads: Mutex<Vec<(String, PathBuf)>>,
}

impl MockGateway {
    /// Downloads yield a solid-colour PNG.
    pub fn with_photo(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self::with_bytes(png_bytes(width, height, color))
    }

    /// Downloads yield exactly `bytes`.
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            download: bytes,
            fail_download: false,
            fail_send: false,
            sent: Mutex::new(Vec::new()),
            downloads: Mutex::new(Vec::new()),
        }
    }

    /// Every download fails.
    pub fn failing_download() -> Self {
        Self {
            fail_download: true,
            ..Self::with_bytes(Vec::new())
        }
    }

    /// Downloads yield a solid-colour PNG; sending the result photo fails.
    pub fn failing_send(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            fail_send: true,
            ..Self::with_photo(width, height, color)
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn downloaded_ids(&self) -> Vec<String> {
        self.downloads
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Parent directories the downloads were written into.
    pub fn download_dirs(&self) -> Vec<PathBuf> {
        self.downloads
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, path)| path.parent().map(Path::to_path_buf))
            .collect()
    }
}

impl ChatGateway for MockGateway {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> Result<(), GatewayError> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn reply_text(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        text: &str,
    ) -> Result<(), GatewayError> {
        self.sent.lock().unwrap().push(Sent::Reply {
            chat_id,
            reply_to,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_photo(&self, chat_id: ChatId, path: &Path) -> Result<(), GatewayError> {
        if self.fail_send {
            return Err(GatewayError::Request("Bad Request: chat not found".to_string()));
        }
        let image = image::open(path)
            .map_err(|e| GatewayError::Request(e.to_string()))?
            .to_rgb8();
        self.sent.lock().unwrap().push(Sent::Photo { chat_id, image });
        Ok(())
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), GatewayError> {
        self.downloads
            .lock()
            .unwrap()
            .push((file_id.to_string(), dest.to_path_buf()));
        if self.fail_download {
            return Err(GatewayError::Download(format!("file '{file_id}' expired")));
        }
        tokio::fs::write(dest, &self.download).await?;
        Ok(())
    }
}

/// Model double: either cuts out the left half of the image or fails.
pub struct MockRemover {
    fail: bool,
    calls: AtomicUsize,
}

impl MockRemover {
    /// Left half becomes fully transparent, right half stays opaque.
    pub fn cutout() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BackgroundRemover for MockRemover {
    fn name(&self) -> &str {
        "mock"
    }

    async fn remove_background(&self, image: DynamicImage) -> Result<RgbaImage, RemovalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RemovalError::Status {
                status: 500,
                body: "model crashed".to_string(),
            });
        }

        let mut rgba = image.to_rgba8();
        let half = rgba.width() / 2;
        for (x, _, pixel) in rgba.enumerate_pixels_mut() {
            if x < half {
                pixel[3] = 0;
            }
        }
        Ok(rgba)
    }
}
