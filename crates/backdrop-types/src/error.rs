use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration:\n{}", format_problems(.0))]
    Invalid(Vec<String>),
}

fn format_problems(problems: &[String]) -> String {
    problems
        .iter()
        .map(|p| format!("  - {p}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors from the messaging gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Request(String),

    #[error("file download failed: {0}")]
    Download(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the background-removal model.
#[derive(Debug, Error)]
pub enum RemovalError {
    #[error("model request failed: {0}")]
    Request(String),

    #[error("model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to encode model input: {0}")]
    Encode(String),

    #[error("failed to decode model output: {0}")]
    Decode(String),
}

/// Processing faults inside the photo pipeline.
///
/// These are logged with full detail; the user only ever sees the generic
/// failure text.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("photo message carries no variants")]
    NoPhoto,

    #[error("download failed: {0}")]
    Download(#[source] GatewayError),

    #[error("failed to decode photo: {0}")]
    Decode(String),

    #[error("background removal failed: {0}")]
    Removal(#[from] RemovalError),

    #[error("failed to load background '{path}': {message}")]
    Background { path: PathBuf, message: String },

    #[error("failed to encode result: {0}")]
    Encode(String),

    #[error("failed to send result: {0}")]
    Send(#[source] GatewayError),

    #[error("temp storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image task failed: {0}")]
    Task(String),
}
