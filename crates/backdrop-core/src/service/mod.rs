//! Bot use cases.
//!
//! `BackdropBot` wires the router, session store and photo pipeline to the
//! gateway and model ports. It depends on traits -- never on concrete
//! infrastructure implementations.

pub mod bot;

pub use bot::BackdropBot;
