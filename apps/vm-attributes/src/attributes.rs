//! Subject-driven attribute application: resolve the configured attribute
//! names, locate the VM the event points at, stamp the matching fields.

use time::OffsetDateTime;
use time::macros::format_description;
use vce_core::{CloudEvent, DispatchResult, HandlerError};

use crate::config::AttributeNames;
use crate::vsphere::{CustomFieldDef, InventoryApi};

/// Subjects that mark a power-on, stamping `last_poweredon`.
const POWERED_ON_SUBJECTS: [&str; 3] = [
    "DrsVmPoweredOnEvent",
    "VmPoweredOnEvent",
    "VmPoweringOnWithCustomizedDVPortEvent",
];

/// Subjects that mark a new VM, stamping `owner` and `creation_date`.
const CREATED_SUBJECTS: [&str; 3] = ["VmCreatedEvent", "VmClonedEvent", "VmRegisteredEvent"];

/// Event fields the attribute handler dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmEvent {
    pub vm_id: String,
    pub user_name: String,
    pub subject: String,
}

impl VmEvent {
    /// Extracts `data.Vm.Vm.Value` and `data.UserName` from a validated
    /// envelope.
    pub fn from_event(event: &CloudEvent) -> Result<Self, HandlerError> {
        Ok(Self {
            vm_id: event.data_str(&["Vm", "Vm", "Value"])?,
            user_name: event.data_str(&["UserName"])?,
            subject: event.subject.clone(),
        })
    }
}

struct ResolvedAttributes {
    owner: CustomFieldDef,
    creation_date: CustomFieldDef,
    last_poweredon: CustomFieldDef,
}

/// Resolves the three configured names against the service's custom-field
/// catalog. Runs before any inventory scan.
async fn resolve(
    api: &dyn InventoryApi,
    names: &AttributeNames,
) -> Result<ResolvedAttributes, HandlerError> {
    let defs = api.custom_field_defs().await?;
    let find = |name: &str| defs.iter().find(|def| def.name == name).cloned();
    match (
        find(&names.owner),
        find(&names.creation_date),
        find(&names.last_poweredon),
    ) {
        (Some(owner), Some(creation_date), Some(last_poweredon)) => Ok(ResolvedAttributes {
            owner,
            creation_date,
            last_poweredon,
        }),
        _ => Err(HandlerError::MissingAttributeDefinition),
    }
}

/// Applies the subject-selected attributes to the VM named by the event.
///
/// The two subject sets are not mutually exclusive; each branch fires on
/// its own match.
pub async fn apply(
    api: &dyn InventoryApi,
    names: &AttributeNames,
    event: &VmEvent,
) -> Result<DispatchResult, HandlerError> {
    let attributes = resolve(api, names).await?;

    let vms = api.virtual_machines().await?;
    let vm = vms
        .iter()
        .find(|vm| vm.vm == event.vm_id)
        .ok_or(HandlerError::VmNotFound)?;
    tracing::debug!(vm = %vm.vm, name = %vm.name, "virtual machine found");

    let today = today();
    if POWERED_ON_SUBJECTS.contains(&event.subject.as_str()) {
        tracing::debug!(attribute = %attributes.last_poweredon.name, "applying attribute");
        api.set_custom_field(&vm.vm, attributes.last_poweredon.key, &today)
            .await?;
    }
    if CREATED_SUBJECTS.contains(&event.subject.as_str()) {
        tracing::debug!(attribute = %attributes.owner.name, "applying attribute");
        api.set_custom_field(&vm.vm, attributes.owner.key, &event.user_name)
            .await?;
        tracing::debug!(attribute = %attributes.creation_date.name, "applying attribute");
        api.set_custom_field(&vm.vm, attributes.creation_date.key, &today)
            .await?;
    }

    Ok(DispatchResult::ok(
        "Custom attributes were successfully applied",
    ))
}

/// Current date in the `DD/MM/YYYY` form the attributes carry.
fn today() -> String {
    let format = format_description!("[day]/[month]/[year]");
    OffsetDateTime::now_utc()
        .date()
        .format(&format)
        .unwrap_or_else(|_| "01/01/1970".into())
}
