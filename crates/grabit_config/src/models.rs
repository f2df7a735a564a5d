// --- File: crates/grabit_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker value meaning "read this field from the secret environment".
pub const SECRET_FROM_ENV: &str = "secret_from_env";

// --- Database Config ---
// Holds the MySQL connection parameters. The password is a secret and is
// normally injected from GRABIT_SECRET_DATABASE_PASSWORD.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl DatabaseConfig {
    /// Returns `true` when the password still has to be resolved from the environment.
    pub fn password_pending(&self) -> bool {
        self.password.is_empty() || self.password == SECRET_FROM_ENV
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: "grabitdb".to_string(),
            user: "root".to_string(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,     // trace | debug | info | warn | error
    pub directory: String, // where the event log file lives
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: ".".to_string(),
            file_name: "error_log.txt".to_string(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
