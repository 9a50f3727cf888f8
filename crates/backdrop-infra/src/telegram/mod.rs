//! Telegram Bot API adapter.
//!
//! `gateway` implements the outbound [`ChatGateway`](backdrop_core::gateway::ChatGateway)
//! port; `convert` maps inbound teloxide messages onto [`InboundEvent`](backdrop_types::event::InboundEvent).

pub mod convert;
pub mod gateway;

pub use convert::event_from_message;
pub use gateway::TelegramGateway;
