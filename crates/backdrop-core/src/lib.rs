//! Business logic and port definitions for Backdrop.
//!
//! This crate defines the "ports" (`ChatGateway`, `BackgroundRemover`) that
//! the infrastructure layer implements, plus everything that does not touch
//! the network: the session store, the event router, compositing, and the
//! photo pipeline. It depends only on `backdrop-types` -- never on
//! `backdrop-infra` or any SDK/HTTP crate.

pub mod chat;
pub mod gateway;
pub mod imaging;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;
