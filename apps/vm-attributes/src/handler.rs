//! Invocation pipeline: validate the event, load configuration, open a
//! scoped vCenter session, apply attributes, release the session on every
//! exit path.

use std::path::Path;

use vce_core::{CloudEvent, DispatchResult, HandlerError};

use crate::attributes::{self, VmEvent};
use crate::config;
use crate::vsphere::VsphereSession;

/// Environment variable naming the secret that holds the configuration.
pub const SECRET_NAME_VAR: &str = "VC_SECRET_NAME";
pub const DEFAULT_SECRET_NAME: &str = "vcconfig";

/// Handles one routed event. Never fails outward; every error is converted
/// to the (message, status) pair returned to the event router.
pub async fn process(raw: &str, config_path: &Path) -> DispatchResult {
    metrics::counter!("events_received", "handler" => "vm-attributes").increment(1);
    tracing::debug!(event = %raw, "received cloud event");

    match dispatch(raw, config_path).await {
        Ok(result) => result,
        Err(err) => {
            metrics::counter!("dispatch_failures", "handler" => "vm-attributes").increment(1);
            tracing::error!(error = %err, "attribute application failed");
            DispatchResult::from(err)
        }
    }
}

async fn dispatch(raw: &str, config_path: &Path) -> Result<DispatchResult, HandlerError> {
    let event = CloudEvent::parse(raw)?;
    let vm_event = VmEvent::from_event(&event)?;
    tracing::debug!(vm = %vm_event.vm_id, subject = %vm_event.subject, "validated cloud event");

    let config = config::load(config_path)?;
    let session = VsphereSession::connect(&config.vcenter).await?;
    let result = attributes::apply(&session, &config.attributes, &vm_event).await;
    session.logout().await;
    result
}
