//! Configuration for the GrabIt device inventory.
//!
//! Values are layered: built-in defaults, then `config/default.*`, then
//! `config/<RUN_ENV>.*`, then `GRABIT__SECTION__KEY` environment variables.
//! Secrets are never read from files; see [`resolve_secrets`].

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub mod env_vars;
pub mod models;

pub use models::*;

/// Loads the application configuration from `./config` (or `GRABIT_CONFIG_DIR`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("GRABIT_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let config = load_config_from(&config_dir)?;
    Ok(resolve_secrets(config))
}

/// Loads the layered configuration rooted at `config_dir` without touching secrets.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "Loading configuration from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let defaults = AppConfig::default();
    let builder = Config::builder()
        .set_default("database.host", defaults.database.host)?
        .set_default("database.port", i64::from(defaults.database.port))?
        .set_default("database.database", defaults.database.database)?
        .set_default("database.user", defaults.database.user)?
        .set_default("database.password", defaults.database.password)?
        .set_default("logging.level", defaults.logging.level)?
        .set_default("logging.directory", defaults.logging.directory)?
        .set_default("logging.file_name", defaults.logging.file_name)?
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    builder.build()?.try_deserialize()
}

/// Fills secret fields from the process environment.
pub fn resolve_secrets(config: AppConfig) -> AppConfig {
    resolve_secrets_with(config, env_vars::get_secret_env_var)
}

/// Fills secret fields using `lookup`, which maps a secret path such as
/// `"database.password"` to its value.
pub fn resolve_secrets_with<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    if config.database.password_pending() {
        match lookup("database.password") {
            Some(secret) => config.database.password = secret,
            None => {
                warn!(
                    "Secret {} not set; connecting without a password",
                    env_vars::secret_path_to_env_var("database.password")
                );
                config.database.password.clear();
            }
        }
    }
    config
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment once.
///
/// `DOTENV_OVERRIDE` selects a different file; the default is `.env`.
/// Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
