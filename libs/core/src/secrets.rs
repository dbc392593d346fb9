use std::env;
use std::path::PathBuf;

/// Directory the function watchdog mounts secrets into.
const SECRETS_DIR: &str = "/var/openfaas/secrets";

/// Resolves the configuration file for a handler.
///
/// `env_var` names the secret holding the handler configuration;
/// `default_name` is used when the variable is unset or empty.
pub fn secret_path(env_var: &str, default_name: &str) -> PathBuf {
    secret_path_from(env::var(env_var).ok(), default_name)
}

fn secret_path_from(name: Option<String>, default_name: &str) -> PathBuf {
    let name = match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => default_name.to_string(),
    };
    PathBuf::from(SECRETS_DIR).join(name)
}
