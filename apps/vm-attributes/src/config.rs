//! Typed configuration for the attribute-setting handler.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use vce_core::HandlerError;

/// `vcenter:` section of the handler secret. All keys are mandatory.
///
/// `server` is a host or host:port; a scheme prefix is honored when present
/// and defaults to `https://` otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct VcenterConfig {
    pub server: String,
    pub user: String,
    pub password: String,
    pub ssl_verify: bool,
}

/// `attributes:` section naming the three custom attributes the handler
/// writes. All keys are mandatory.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeNames {
    pub owner: String,
    pub creation_date: String,
    pub last_poweredon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VcConfig {
    pub vcenter: VcenterConfig,
    pub attributes: AttributeNames,
}

/// Loads and validates the handler configuration, failing fast on an
/// unreadable file or a missing mandatory key.
pub fn load(path: &Path) -> Result<VcConfig, HandlerError> {
    let raw = fs::read_to_string(path).map_err(|err| {
        HandlerError::Config(format!("Could not read vcenter configuration: {err}"))
    })?;
    serde_yaml_bw::from_str(&raw).map_err(|err| {
        HandlerError::Config(format!("Missing mandatory configuration key: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vcconfig");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn full_config_parses() {
        let (_dir, path) = write_config(
            r#"
vcenter:
  server: vcenter.local
  user: administrator@vsphere.local
  password: hunter2
  ssl_verify: false
attributes:
  owner: veba.owner
  creation_date: veba.creation_date
  last_poweredon: veba.last_poweredon
"#,
        );
        let cfg = load(&path).expect("load config");
        assert_eq!(cfg.vcenter.server, "vcenter.local");
        assert!(!cfg.vcenter.ssl_verify);
        assert_eq!(cfg.attributes.owner, "veba.owner");
        assert_eq!(cfg.attributes.last_poweredon, "veba.last_poweredon");
    }

    #[test]
    fn missing_attribute_name_fails_fast() {
        let (_dir, path) = write_config(
            r#"
vcenter:
  server: vcenter.local
  user: administrator@vsphere.local
  password: hunter2
  ssl_verify: true
attributes:
  owner: veba.owner
  creation_date: veba.creation_date
"#,
        );
        let err = load(&path).unwrap_err();
        assert!(matches!(err, HandlerError::Config(_)));
        assert!(err.to_string().contains("last_poweredon"));
    }

    #[test]
    fn missing_vcenter_key_fails_fast() {
        let (_dir, path) = write_config(
            r#"
vcenter:
  server: vcenter.local
  user: administrator@vsphere.local
  ssl_verify: true
attributes:
  owner: a
  creation_date: b
  last_poweredon: c
"#,
        );
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let err = load(Path::new("/nonexistent/vcconfig")).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Could not read vcenter configuration")
        );
    }
}
