//! An abstraction layer for reply backends.
//!
//! This crate establishes a unified protocol between the conversation
//! core and whatever service turns a user message into a reply, so that
//! the hosting application can swap backends without modifying the core
//! codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.
//!
//! Users of this crate may add some extra functionalities or wrappers,
//! depending on their own use cases. Those extra code should be placed
//! in their own crate.

#![deny(missing_docs)]

mod error;
mod responder;

pub use error::*;
pub use responder::*;
