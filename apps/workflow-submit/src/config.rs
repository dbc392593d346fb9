//! Typed configuration for the workflow-submission handler.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use vce_core::HandlerError;

/// `argoserver:` section of the handler secret.
///
/// `server`, `namespace`, `serviceaccount`, and `template` are mandatory;
/// the rest fall back to documented defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgoConfig {
    pub server: String,
    pub namespace: String,
    pub serviceaccount: String,
    pub template: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_event_param_name")]
    pub event_param_name: String,
    #[serde(default)]
    pub base64_encode: bool,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    argoserver: ArgoConfig,
}

/// Loads and validates the handler configuration, failing fast on an
/// unreadable file or a missing mandatory key.
pub fn load(path: &Path) -> Result<ArgoConfig, HandlerError> {
    let raw = fs::read_to_string(path).map_err(|err| {
        HandlerError::Config(format!("Could not read argo configuration: {err}"))
    })?;
    let file: ConfigFile = serde_yaml_bw::from_str(&raw).map_err(|err| {
        HandlerError::Config(format!("Missing mandatory configuration key: {err}"))
    })?;
    Ok(file.argoserver)
}

fn default_protocol() -> String {
    "http".into()
}

fn default_event_param_name() -> String {
    "event".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("argoconfig");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_are_applied() {
        let (_dir, path) = write_config(
            r#"
argoserver:
  server: argo.local:2746
  namespace: veba
  serviceaccount: default
  template: vm-lifecycle
"#,
        );
        let cfg = load(&path).expect("load config");
        assert_eq!(cfg.protocol, "http");
        assert_eq!(cfg.event_param_name, "event");
        assert!(!cfg.base64_encode);
        assert!(cfg.labels.is_empty());
    }

    #[test]
    fn full_config_parses() {
        let (_dir, path) = write_config(
            r#"
argoserver:
  server: argo.local:2746
  namespace: veba
  serviceaccount: argo-sa
  template: vm-lifecycle
  protocol: https
  event_param_name: payload
  base64_encode: true
  labels:
    team: sre
    site: emea
"#,
        );
        let cfg = load(&path).expect("load config");
        assert_eq!(cfg.protocol, "https");
        assert_eq!(cfg.event_param_name, "payload");
        assert!(cfg.base64_encode);
        assert_eq!(cfg.labels.get("team").map(String::as_str), Some("sre"));
    }

    #[test]
    fn missing_mandatory_key_fails_fast() {
        let (_dir, path) = write_config(
            r#"
argoserver:
  namespace: veba
  serviceaccount: default
  template: vm-lifecycle
"#,
        );
        let err = load(&path).unwrap_err();
        assert!(matches!(err, HandlerError::Config(_)));
        assert!(err.to_string().contains("server"));
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let err = load(Path::new("/nonexistent/argoconfig")).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Could not read argo configuration")
        );
    }
}
