//! rembg background-removal backend.
//!
//! Talks to a running rembg HTTP server (`rembg s`), which hosts the
//! segmentation models (u2net, isnet-general-use, ...).

pub mod client;

pub use client::RembgRemover;
