//! Argo server submission client.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use vce_core::{CloudEvent, HandlerError};

use crate::config::ArgoConfig;

/// Marker label attached to every submission.
const SOURCE_LABEL: &str = "from=veba";

/// Body for `POST /api/v1/workflows/{namespace}/submit`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitRequest {
    resource_kind: &'static str,
    resource_name: String,
    submit_options: SubmitOptions,
}

#[derive(Debug, Serialize)]
struct SubmitOptions {
    serviceaccount: String,
    parameters: Vec<String>,
    labels: String,
}

/// One-shot client for the workflow-submission endpoint. Constructed fresh
/// per invocation; holds no state beyond the loaded configuration.
pub struct ArgoClient {
    http: reqwest::Client,
    config: ArgoConfig,
}

impl ArgoClient {
    pub fn new(config: ArgoConfig) -> Result<Self, HandlerError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("vce-workflow-submit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| {
                HandlerError::Connection(format!("Unable to build argo client: {err}"))
            })?;
        Ok(Self { http, config })
    }

    /// Submits the configured workflow template for `event`.
    pub async fn submit(&self, event: &CloudEvent) -> Result<(), HandlerError> {
        let url = self.submit_url();
        let body = self.request_body(event);
        tracing::debug!(url = %url, template = %self.config.template, "submitting workflow");

        let res = self.http.post(&url).json(&body).send().await.map_err(|err| {
            HandlerError::Connection(format!(
                "Unable to make request to argo server {}: {err}",
                self.config.server
            ))
        })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %body, "argo server rejected the submission");
            return Err(HandlerError::UpstreamHttp { status });
        }
        Ok(())
    }

    fn submit_url(&self) -> String {
        format!(
            "{}://{}/api/v1/workflows/{}/submit",
            self.config.protocol, self.config.server, self.config.namespace
        )
    }

    pub(crate) fn request_body(&self, event: &CloudEvent) -> SubmitRequest {
        SubmitRequest {
            resource_kind: "WorkflowTemplate",
            resource_name: self.config.template.clone(),
            submit_options: SubmitOptions {
                serviceaccount: self.config.serviceaccount.clone(),
                parameters: vec![self.event_parameter(event)],
                labels: self.labels(event),
            },
        }
    }

    /// Comma-joined label string: the fixed marker first, then configured
    /// labels in key order, then the two event-derived labels.
    fn labels(&self, event: &CloudEvent) -> String {
        let mut labels = vec![SOURCE_LABEL.to_string()];
        labels.extend(self.config.labels.iter().map(|(k, v)| format!("{k}={v}")));
        labels.push(format!("event_id={}", event.id));
        labels.push(format!("event_subject={}", event.subject));
        labels.join(",")
    }

    fn event_parameter(&self, event: &CloudEvent) -> String {
        let payload = event.to_json();
        let payload = if self.config.base64_encode {
            BASE64.encode(payload)
        } else {
            payload
        };
        format!("{}={}", self.config.event_param_name, payload)
    }
}
