//! Process-wide tracing setup for the vCenter CloudEvent functions.
//!
//! Each binary installs the subscriber exactly once at startup and passes
//! explicit config down; nothing mutates logging state after that.

use std::env;
use std::sync::OnceLock;

use anyhow::Result;
use tracing_subscriber::layer::Layer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub json_logs: bool,
    pub debug: bool,
}

impl TelemetryConfig {
    /// Reads the logging knobs from the environment.
    ///
    /// `WRITE_DEBUG` lowers the default filter to `debug`; an explicit
    /// `RUST_LOG` always wins. `LOG_FORMAT=json` switches to structured
    /// output.
    pub fn from_env(default_service_name: &str) -> Self {
        Self::from_parts(
            env::var("SERVICE_NAME").ok(),
            env::var("LOG_FORMAT").ok(),
            env::var("WRITE_DEBUG").is_ok(),
            default_service_name,
        )
    }

    fn from_parts(
        service_name: Option<String>,
        log_format: Option<String>,
        debug: bool,
        default_service_name: &str,
    ) -> Self {
        let service_name = service_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| default_service_name.to_string());
        let json_logs = log_format
            .map(|v| matches!(v.to_lowercase().as_str(), "json"))
            .unwrap_or(false);
        Self {
            service_name,
            json_logs,
            debug,
        }
    }
}

/// Installs the subscriber. Idempotent; later calls are no-ops.
pub fn init_telemetry(cfg: &TelemetryConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let default_level = if cfg.debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = if cfg.json_logs {
        tracing_subscriber::fmt::layer().json().flatten_event(true).boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .ok();

    INIT.set(()).ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let cfg = TelemetryConfig::from_parts(None, None, false, "vce-workflow-submit");
        assert_eq!(cfg.service_name, "vce-workflow-submit");
        assert!(!cfg.json_logs);
        assert!(!cfg.debug);
    }

    #[test]
    fn debug_toggle_and_json_format() {
        let cfg = TelemetryConfig::from_parts(
            Some("custom".into()),
            Some("JSON".into()),
            true,
            "fallback",
        );
        assert_eq!(cfg.service_name, "custom");
        assert!(cfg.json_logs);
        assert!(cfg.debug);
    }

    #[test]
    fn blank_service_name_falls_back() {
        let cfg = TelemetryConfig::from_parts(Some("  ".into()), None, false, "fallback");
        assert_eq!(cfg.service_name, "fallback");
    }

    #[test]
    fn init_is_idempotent() {
        let cfg = TelemetryConfig::from_parts(None, None, false, "test");
        init_telemetry(&cfg).unwrap();
        init_telemetry(&cfg).unwrap();
    }
}
