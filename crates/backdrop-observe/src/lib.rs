//! Observability for Backdrop: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{LogOptions, init_tracing, shutdown_tracing};
