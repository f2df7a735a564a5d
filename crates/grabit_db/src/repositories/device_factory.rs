//! Factory for creating device repositories

use crate::error::DbError;
use crate::repositories::device_sql::SqlDeviceRepository;
use crate::{DbClient, RepositoryFactory};
use grabit_config::{AppConfig, DatabaseConfig};
use tracing::debug;

/// Factory for creating device repositories
#[derive(Debug, Clone)]
pub struct DeviceRepositoryFactory;

impl DeviceRepositoryFactory {
    /// Create a new device repository factory
    pub fn new() -> Self {
        Self
    }

    /// Create a repository from a database configuration
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConfigError`] when the configuration is unusable.
    pub fn from_db_config(
        &self,
        db_config: &DatabaseConfig,
    ) -> Result<SqlDeviceRepository, DbError> {
        debug!("Creating device repository from database configuration");
        let db_client = DbClient::from_config(db_config)?;
        Ok(self.create_repository(db_client))
    }

    /// Create a repository from the application configuration
    ///
    /// Also installs the console + event log subscriber described by the
    /// `[logging]` section, unless a global subscriber is already set.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConfigError`] when the database section is unusable.
    pub fn from_app_config(&self, config: &AppConfig) -> Result<SqlDeviceRepository, DbError> {
        grabit_common::logging::init_from_config(&config.logging);
        self.from_db_config(&config.database)
    }
}

impl Default for DeviceRepositoryFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryFactory<SqlDeviceRepository, DbClient> for DeviceRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlDeviceRepository {
        SqlDeviceRepository::new(db_client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_app_config_uses_database_section() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.logging.directory = dir.path().to_string_lossy().into_owned();

        let repository = DeviceRepositoryFactory::new()
            .from_app_config(&config)
            .unwrap();

        assert_eq!(
            repository.client().to_string(),
            "DbClient(localhost:3306/grabitdb)"
        );
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = DatabaseConfig {
            database: String::new(),
            ..DatabaseConfig::default()
        };

        let err = DeviceRepositoryFactory::default()
            .from_db_config(&config)
            .unwrap_err();

        assert!(matches!(err, DbError::ConfigError(_)));
    }
}
