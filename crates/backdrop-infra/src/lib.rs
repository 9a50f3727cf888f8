//! Infrastructure layer for Backdrop.
//!
//! Contains implementations of the ports defined in `backdrop-core`:
//! the Telegram gateway, the rembg HTTP background remover, plus
//! configuration loading/validation and work directory management.

pub mod config;
pub mod filesystem;
pub mod rembg;
pub mod telegram;
