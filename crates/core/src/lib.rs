//! Core conversation logic: the transcript, the send pipeline, and the
//! retry protocol around the configured responder.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod controller;
mod responder_client;
pub mod transcript;

pub use controller::{
    ControllerBuilder, ConversationController, DEFAULT_SYSTEM_PROMPT,
    DEGRADED_REPLY, FALLBACK_REPLY,
};
pub use responder_client::ResponderClient;
