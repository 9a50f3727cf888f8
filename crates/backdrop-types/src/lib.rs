//! Shared domain types for Backdrop.
//!
//! This crate contains the core domain types used across the Backdrop bot:
//! chat identifiers, the background catalog, inbound events, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod background;
pub mod chat;
pub mod config;
pub mod error;
pub mod event;
