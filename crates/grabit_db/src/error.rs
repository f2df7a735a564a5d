//! Error types for the database client

use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

/// MySQL server error number for a rejected user name or password.
pub const ER_ACCESS_DENIED_ERROR: u16 = 1045;

/// Errors that can occur when working with the device store
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx that was not classified further
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// The server could not be reached at all
    #[error("Database server unreachable: {0}")]
    Unreachable(String),

    /// The server rejected the credentials
    #[error("Database access denied: {0}")]
    AccessDenied(String),

    /// Any other failure while connecting or disconnecting
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// A statement was issued with no open connection
    #[error("Database connection is not open")]
    NotConnected,

    /// A connection was opened while one was already open
    #[error("Database connection is already open")]
    AlreadyConnected,

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),
}

impl DbError {
    /// Classify a failure raised while establishing a connection.
    pub fn from_connect_error(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut => {
                DbError::Unreachable(err.to_string())
            }
            sqlx::Error::Database(db_err) => {
                let number = db_err
                    .try_downcast_ref::<MySqlDatabaseError>()
                    .map(MySqlDatabaseError::number);
                if number == Some(ER_ACCESS_DENIED_ERROR) {
                    DbError::AccessDenied(db_err.to_string())
                } else {
                    DbError::ConnectionError(err.to_string())
                }
            }
            _ => DbError::ConnectionError(err.to_string()),
        }
    }

    /// Short stable label used as a structured logging field.
    pub fn category(&self) -> &'static str {
        match self {
            DbError::SqlxError(_) => "sqlx",
            DbError::ConfigError(_) => "config",
            DbError::Unreachable(_) => "unreachable",
            DbError::AccessDenied(_) => "access_denied",
            DbError::ConnectionError(_) => "connection",
            DbError::NotConnected => "not_connected",
            DbError::AlreadyConnected => "already_connected",
            DbError::QueryError(_) => "query",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_failure_is_unreachable() {
        let err = sqlx::Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));

        let classified = DbError::from_connect_error(err);

        assert!(matches!(classified, DbError::Unreachable(_)));
        assert_eq!(classified.category(), "unreachable");
    }

    #[test]
    fn test_timeout_is_unreachable() {
        let classified = DbError::from_connect_error(sqlx::Error::PoolTimedOut);

        assert!(matches!(classified, DbError::Unreachable(_)));
    }

    #[test]
    fn test_other_failure_is_connection_error() {
        let classified = DbError::from_connect_error(sqlx::Error::Protocol("bad handshake".into()));

        assert!(matches!(classified, DbError::ConnectionError(ref m) if m.contains("bad handshake")));
        assert_eq!(classified.category(), "connection");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            DbError::NotConnected.to_string(),
            "Database connection is not open"
        );
        assert_eq!(
            DbError::AccessDenied("nope".to_string()).to_string(),
            "Database access denied: nope"
        );
    }
}
