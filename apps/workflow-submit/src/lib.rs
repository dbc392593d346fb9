//! vCenter CloudEvent function that submits a templated Argo workflow for
//! every event routed to it.
//!
//! ```text
//! The event router POSTs a CloudEvent to `/`; the payload is validated,
//! wrapped into a workflow-template submission, and posted to the Argo
//! server named in the handler secret.
//! ```
pub mod client;
pub mod config;
pub mod handler;

pub use handler::process;
