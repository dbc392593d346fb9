//! vCenter CloudEvent function that stamps custom metadata attributes on a
//! virtual machine based on the event subject.
//!
//! ```text
//! The event router POSTs a CloudEvent to `/`; the payload names a VM and
//! the acting user, and the subject decides which configured attributes
//! (owner, creation date, last power-on) get written to the inventory.
//! ```
pub mod attributes;
pub mod config;
pub mod handler;
pub mod vsphere;

pub use handler::process;
