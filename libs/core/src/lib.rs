//! Core contracts shared by the vCenter CloudEvent functions.
//!
//! This crate exposes the event envelope delivered by the event router, the
//! validation helpers that turn a raw payload into typed fields, the error
//! taxonomy shared by both handlers, and the (message, status) pair every
//! invocation reports back to the router.
pub mod error;
pub mod event;
pub mod respond;
pub mod secrets;

pub use error::*;
pub use event::*;
pub use respond::*;
pub use secrets::*;
