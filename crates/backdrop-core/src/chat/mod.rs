//! Per-chat state and inbound event routing.
//!
//! - `session` -- `SessionStore`, the chat -> selected background table
//! - `router` -- `classify`, mapping an `InboundEvent` onto a `Route`

pub mod router;
pub mod session;

pub use router::{Route, classify};
pub use session::SessionStore;
