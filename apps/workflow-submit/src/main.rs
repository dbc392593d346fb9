//! Workflow-submission handler binary: one HTTP endpoint for the event
//! router, one invocation per request.

use std::path::PathBuf;

use anyhow::Result;
use axum::{Router, extract::State, response::IntoResponse, routing::post};
use vce_core::secret_path;
use vce_telemetry::{TelemetryConfig, init_telemetry};
use vce_workflow_submit::handler::{DEFAULT_SECRET_NAME, SECRET_NAME_VAR, process};

#[derive(Clone)]
struct AppState {
    config_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env(env!("CARGO_PKG_NAME"));
    init_telemetry(&telemetry)?;

    let state = AppState {
        config_path: secret_path(SECRET_NAME_VAR, DEFAULT_SECRET_NAME),
    };
    let app = Router::new().route("/", post(handle_event)).with_state(state);

    let addr: std::net::SocketAddr = std::env::var("BIND")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()?;
    tracing::info!(service = %telemetry.service_name, %addr, "workflow-submit listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn handle_event(State(state): State<AppState>, body: String) -> axum::response::Response {
    process(&body, &state.config_path).await.into_response()
}
