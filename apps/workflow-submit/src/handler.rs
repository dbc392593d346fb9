//! Invocation pipeline: validate the event, load configuration, submit the
//! workflow, map the outcome to a (message, status) pair.

use std::path::Path;

use vce_core::{CloudEvent, DispatchResult, HandlerError};

use crate::client::ArgoClient;
use crate::config;

/// Environment variable naming the secret that holds the configuration.
pub const SECRET_NAME_VAR: &str = "ARGO_SECRET_NAME";
pub const DEFAULT_SECRET_NAME: &str = "argoconfig";

/// Handles one routed event. Never fails outward; every error is converted
/// to the (message, status) pair returned to the event router.
pub async fn process(raw: &str, config_path: &Path) -> DispatchResult {
    metrics::counter!("events_received", "handler" => "workflow-submit").increment(1);
    tracing::debug!(event = %raw, "received cloud event");

    match dispatch(raw, config_path).await {
        Ok(result) => result,
        Err(err) => {
            metrics::counter!("dispatch_failures", "handler" => "workflow-submit").increment(1);
            tracing::error!(error = %err, "workflow submission failed");
            DispatchResult::from(err)
        }
    }
}

async fn dispatch(raw: &str, config_path: &Path) -> Result<DispatchResult, HandlerError> {
    let event = CloudEvent::parse(raw)?;
    tracing::debug!(id = %event.id, subject = %event.subject, "validated cloud event");

    let config = config::load(config_path)?;
    let client = ArgoClient::new(config)?;
    client.submit(&event).await?;
    Ok(DispatchResult::ok("Argo workflow was successfully submitted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    const NO_CONFIG: &str = "/nonexistent/argoconfig";

    #[tokio::test]
    async fn invalid_json_returns_500_with_decode_marker() {
        let result = process("{not json", Path::new(NO_CONFIG)).await;
        assert_eq!(result.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(result.message.contains("JSONDecodeError"));
    }

    #[tokio::test]
    async fn missing_key_returns_500_naming_the_key() {
        let payload = json!({ "id": "1", "source": "s", "data": {} }).to_string();
        let result = process(&payload, Path::new(NO_CONFIG)).await;
        assert_eq!(result.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(result.message.contains("'subject'"));
    }

    #[tokio::test]
    async fn unreadable_config_returns_500() {
        let payload = json!({
            "id": "1",
            "source": "s",
            "subject": "VmPoweredOnEvent",
            "data": {}
        })
        .to_string();
        let result = process(&payload, Path::new(NO_CONFIG)).await;
        assert_eq!(result.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            result
                .message
                .starts_with("Could not read argo configuration")
        );
    }

    #[tokio::test]
    async fn config_missing_mandatory_key_returns_500() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("argoconfig");
        std::fs::write(
            &path,
            "argoserver:\n  namespace: veba\n  serviceaccount: sa\n  template: t\n",
        )
        .unwrap();

        let payload = json!({
            "id": "1",
            "source": "s",
            "subject": "VmPoweredOnEvent",
            "data": {}
        })
        .to_string();
        let result = process(&payload, &path).await;
        assert_eq!(result.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(result.message.contains("server"));
    }
}
