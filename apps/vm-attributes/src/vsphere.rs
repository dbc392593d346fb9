//! Thin client for the slice of the vCenter Automation API the attribute
//! handler touches: session lifecycle, VM enumeration, and custom-field
//! reads/writes.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use vce_core::HandlerError;

use crate::config::VcenterConfig;

const SESSION_HEADER: &str = "vmware-api-session-id";

/// Custom-field definition from the inventory service's field catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomFieldDef {
    pub key: i64,
    pub name: String,
}

/// Minimal VM summary from the inventory listing. `vm` is the internal
/// identifier the event's VM reference points at (e.g. `vm-42`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VmSummary {
    pub vm: String,
    pub name: String,
}

/// Inventory operations the attribute dispatcher needs.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn custom_field_defs(&self) -> Result<Vec<CustomFieldDef>, HandlerError>;
    async fn virtual_machines(&self) -> Result<Vec<VmSummary>, HandlerError>;
    async fn set_custom_field(&self, vm: &str, key: i64, value: &str)
    -> Result<(), HandlerError>;
}

/// Authenticated vCenter session. Acquired at the start of an invocation
/// and released on every exit path; nothing outlives the invocation.
pub struct VsphereSession {
    http: reqwest::Client,
    base_url: String,
    server: String,
    token: String,
}

impl VsphereSession {
    /// Logs in with the configured credentials and returns a live session.
    pub async fn connect(config: &VcenterConfig) -> Result<Self, HandlerError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("vce-vm-attributes/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!config.ssl_verify)
            .build()
            .map_err(|err| {
                HandlerError::Connection(format!("Unable to build vcenter client: {err}"))
            })?;

        let base_url = base_url(&config.server);
        let res = http
            .post(format!("{base_url}/api/session"))
            .basic_auth(&config.user, Some(&config.password))
            .send()
            .await
            .map_err(|err| {
                HandlerError::Connection(format!("Error connecting to vCenter: {err}"))
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(HandlerError::Connection(format!(
                "Error connecting to vCenter: session request returned {status}"
            )));
        }
        let token: String = res.json().await.map_err(|err| {
            HandlerError::Connection(format!("Error connecting to vCenter: {err}"))
        })?;

        tracing::debug!(server = %config.server, "vcenter session established");
        Ok(Self {
            http,
            base_url,
            server: config.server.clone(),
            token,
        })
    }

    /// Releases the session. Failures are logged only; the invocation
    /// outcome is already decided by the time the session is released.
    pub async fn logout(self) {
        let url = format!("{}/api/session", self.base_url);
        match self
            .http
            .delete(&url)
            .header(SESSION_HEADER, &self.token)
            .send()
            .await
        {
            Ok(_) => tracing::debug!(server = %self.server, "vcenter session released"),
            Err(err) => tracing::warn!(error = %err, "failed to release vcenter session"),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, HandlerError> {
        let url = format!("{}{path}", self.base_url);
        let res = self
            .http
            .get(&url)
            .header(SESSION_HEADER, &self.token)
            .send()
            .await
            .map_err(|err| self.unreachable(err))?;

        let status = res.status();
        if !status.is_success() {
            return Err(HandlerError::UpstreamHttp { status });
        }
        res.json().await.map_err(|err| {
            HandlerError::Connection(format!(
                "Invalid response from vCenter {}: {err}",
                self.server
            ))
        })
    }

    fn unreachable(&self, err: reqwest::Error) -> HandlerError {
        HandlerError::Connection(format!("Unable to reach vCenter {}: {err}", self.server))
    }
}

#[async_trait]
impl InventoryApi for VsphereSession {
    async fn custom_field_defs(&self) -> Result<Vec<CustomFieldDef>, HandlerError> {
        self.get_json("/api/vcenter/custom-fields").await
    }

    async fn virtual_machines(&self) -> Result<Vec<VmSummary>, HandlerError> {
        self.get_json("/api/vcenter/vm").await
    }

    async fn set_custom_field(
        &self,
        vm: &str,
        key: i64,
        value: &str,
    ) -> Result<(), HandlerError> {
        let url = format!("{}/api/vcenter/vm/{vm}/custom-fields", self.base_url);
        let res = self
            .http
            .patch(&url)
            .header(SESSION_HEADER, &self.token)
            .json(&json!({ "key": key, "value": value }))
            .send()
            .await
            .map_err(|err| self.unreachable(err))?;

        let status = res.status();
        if !status.is_success() {
            return Err(HandlerError::UpstreamHttp { status });
        }
        Ok(())
    }
}

fn base_url(server: &str) -> String {
    if server.contains("://") {
        server.trim_end_matches('/').to_string()
    } else {
        format!("https://{server}")
    }
}
