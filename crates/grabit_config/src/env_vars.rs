//! Environment variable handling for the GrabIt configuration.
//!
//! Non-secret settings use the `GRABIT__SECTION__KEY` pattern understood by
//! the `config` crate. Secrets use `GRABIT_SECRET_SECTION_KEY`, with a fallback
//! to the legacy `SECTION_KEY` pattern.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "GRABIT";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "GRABIT_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a secret path to an environment variable name
///
/// "database.password" becomes "GRABIT_SECRET_DATABASE_PASSWORD".
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to its legacy environment variable name
///
/// "database.password" becomes "DATABASE_PASSWORD".
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let section = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", section, key).to_uppercase()
}

/// Get an environment variable for a secret path
///
/// The new naming pattern wins; the legacy pattern is only consulted when the
/// new one is unset.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_path_to_env_var(path)) {
        return Some(value);
    }

    env::var(legacy_secret_path_to_env_var(path)).ok()
}
