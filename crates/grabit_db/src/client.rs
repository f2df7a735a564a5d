//! Connection management for the device store
//!
//! The client owns at most one MySQL connection at a time. Callers open it,
//! run a single statement and close it again; nothing is pooled or reused.

use crate::error::DbError;
use grabit_config::{AppConfig, DatabaseConfig};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};
use std::fmt;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};

/// Database client for the device store
pub struct DbClient {
    /// Options every new connection is opened with
    options: MySqlConnectOptions,
    /// `host:port/database`, for diagnostics
    target: String,
    /// The currently open connection, if any
    connection: Mutex<Option<MySqlConnection>>,
}

impl DbClient {
    /// Create a new database client from the application configuration
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConfigError`] when the database section is unusable.
    pub fn new(config: &AppConfig) -> Result<Self, DbError> {
        Self::from_config(&config.database)
    }

    /// Create a new database client from a database configuration
    ///
    /// No connection is made here; see [`DbClient::open_connection`].
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    ///
    /// * The host is empty
    /// * The database name or user is empty
    pub fn from_config(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        if db_config.host.is_empty() {
            return Err(DbError::ConfigError("Database host is empty".to_string()));
        }
        if db_config.database.is_empty() {
            return Err(DbError::ConfigError("Database name is empty".to_string()));
        }
        if db_config.user.is_empty() {
            return Err(DbError::ConfigError("Database user is empty".to_string()));
        }

        let mut options = MySqlConnectOptions::new()
            .host(&db_config.host)
            .port(db_config.port)
            .username(&db_config.user)
            .database(&db_config.database);
        if !db_config.password.is_empty() {
            options = options.password(&db_config.password);
        }

        let target = format!(
            "{}:{}/{}",
            db_config.host, db_config.port, db_config.database
        );
        debug!("Configured database client for {}", target);

        Ok(Self {
            options,
            target,
            connection: Mutex::new(None),
        })
    }

    /// Open a new connection without storing or logging it
    ///
    /// # Errors
    ///
    /// * [`DbError::Unreachable`] when the server cannot be reached
    /// * [`DbError::AccessDenied`] when the credentials are rejected
    /// * [`DbError::ConnectionError`] for anything else
    pub async fn connect(&self) -> Result<MySqlConnection, DbError> {
        self.options
            .connect()
            .await
            .map_err(DbError::from_connect_error)
    }

    /// Open the client's connection
    ///
    /// Logs the outcome and returns `true` when the connection is ready for
    /// a statement. Opening while a connection is already open fails.
    pub async fn open_connection(&self) -> bool {
        let mut slot = self.connection.lock().await;
        if slot.is_some() {
            log_connect_failure(&DbError::AlreadyConnected);
            return false;
        }

        match self.connect().await {
            Ok(connection) => {
                *slot = Some(connection);
                info!("Connected to DB");
                true
            }
            Err(e) => {
                log_connect_failure(&e);
                false
            }
        }
    }

    /// Close the client's connection
    ///
    /// Logs the outcome. Returns `false` when nothing was open or the driver
    /// failed to shut the connection down cleanly.
    pub async fn close_connection(&self) -> bool {
        let connection = self.connection.lock().await.take();

        let Some(connection) = connection else {
            error!(
                category = DbError::NotConnected.category(),
                error = %DbError::NotConnected,
                "An unexpected error occurred while closing the connection."
            );
            return false;
        };

        match connection.close().await {
            Ok(()) => {
                info!("Disconnected from DB");
                true
            }
            Err(e) => {
                error!(error = %e, "An error occurred while closing the connection.");
                false
            }
        }
    }

    /// Whether a connection is currently open
    pub async fn is_open(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Lock the connection slot for running a statement
    pub(crate) async fn connection(&self) -> MutexGuard<'_, Option<MySqlConnection>> {
        self.connection.lock().await
    }
}

fn log_connect_failure(err: &DbError) {
    let message = match err {
        DbError::Unreachable(_) => "Cannot connect to Server",
        DbError::AccessDenied(_) => "Invalid username/password. Please try again",
        _ => "An unexpected error occurred while connecting to the database.",
    };
    error!(category = err.category(), error = %err, "{}", message);
}

impl fmt::Debug for DbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbClient")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for DbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DbClient({})", self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_host_is_rejected() {
        let config = DatabaseConfig {
            host: String::new(),
            ..DatabaseConfig::default()
        };

        let err = DbClient::from_config(&config).unwrap_err();

        assert!(matches!(err, DbError::ConfigError(ref m) if m.contains("host")));
    }

    #[test]
    fn test_empty_user_is_rejected() {
        let config = DatabaseConfig {
            user: String::new(),
            ..DatabaseConfig::default()
        };

        assert!(matches!(
            DbClient::from_config(&config),
            Err(DbError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_new_client_starts_disconnected() {
        let client = DbClient::new(&AppConfig::default()).unwrap();

        assert!(!client.is_open().await);
    }

    #[tokio::test]
    async fn test_close_without_open_fails() {
        let client = DbClient::from_config(&DatabaseConfig::default()).unwrap();

        assert!(!client.close_connection().await);
        assert!(!client.close_connection().await);
    }

    #[test]
    fn test_debug_hides_credentials() {
        let config = DatabaseConfig {
            password: "hunter2".to_string(),
            ..DatabaseConfig::default()
        };
        let client = DbClient::from_config(&config).unwrap();

        let rendered = format!("{:?}", client);

        assert!(rendered.contains("localhost"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_connect_failures_are_logged_by_category() {
        let dir = tempfile::tempdir().unwrap();
        let subscriber =
            grabit_common::subscriber(tracing::Level::INFO, dir.path(), "error_log.txt").unwrap();

        tracing::subscriber::with_default(subscriber, || {
            log_connect_failure(&DbError::Unreachable("refused".to_string()));
            log_connect_failure(&DbError::AccessDenied("user 'root'".to_string()));
            log_connect_failure(&DbError::ConnectionError("bad handshake".to_string()));
        });

        let contents = std::fs::read_to_string(dir.path().join("error_log.txt")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("ERROR") && lines[0].contains("Cannot connect to Server"));
        assert!(lines[1].contains("Invalid username/password. Please try again"));
        assert!(lines[1].contains("category=\"access_denied\""));
        assert!(lines[2]
            .contains("An unexpected error occurred while connecting to the database."));
        assert!(lines[2].contains("bad handshake"));
    }
}
