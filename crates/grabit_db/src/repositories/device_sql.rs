//! MySQL implementation of the device repository
//!
//! All statements are parameterized; names and types are never spliced into
//! SQL text.

use crate::error::DbError;
use crate::models::{Device, DeviceStatus};
use crate::repositories::device::DeviceRepository;
use crate::DbClient;
use grabit_common::log_error;
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use std::future::Future;
use tokio::sync::Mutex;
use tracing::{debug, info};

const CREATE_DEVICES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS devices (
        device_id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        `type` VARCHAR(255) NOT NULL,
        status ENUM('AVAILABLE', 'BUSY') NOT NULL DEFAULT 'AVAILABLE'
    )
"#;

const INSERT_DEVICE: &str = "INSERT INTO devices (name, `type`, status) VALUES (?, ?, ?)";

const UPDATE_DEVICE_STATUS: &str = "UPDATE devices SET status = ? WHERE device_id = ?";

const DELETE_DEVICE: &str = "DELETE FROM devices WHERE device_id = ?";

const SELECT_DEVICES: &str = r#"
    SELECT device_id, name, `type`, status
    FROM devices
    ORDER BY device_id
"#;

const SELECT_DEVICE_BY_ID: &str = r#"
    SELECT device_id, name, `type`, status
    FROM devices
    WHERE device_id = ?
"#;

const COUNT_DEVICES: &str = "SELECT COUNT(*) FROM devices";

/// MySQL implementation of the device repository
#[derive(Debug)]
pub struct SqlDeviceRepository {
    /// The database client
    db_client: DbClient,
    /// Held from open to close so concurrent calls take turns on the slot
    serial: Mutex<()>,
}

impl SqlDeviceRepository {
    /// Create a new SQL device repository
    pub fn new(db_client: DbClient) -> Self {
        Self {
            db_client,
            serial: Mutex::new(()),
        }
    }

    /// The client whose connection every operation goes through
    pub fn client(&self) -> &DbClient {
        &self.db_client
    }

    /// Open a connection, drive `statement` to completion, close the connection.
    ///
    /// `statement` is lazy, so it only touches the connection slot once the
    /// connection is open. Any failure is logged and replaced by `fallback`.
    /// Calls on the same repository run one at a time.
    async fn run<T, F>(&self, operation: &'static str, fallback: T, statement: F) -> T
    where
        F: Future<Output = Result<T, DbError>>,
    {
        let _turn = self.serial.lock().await;

        if !self.db_client.open_connection().await {
            debug!(operation, "Skipping statement without a connection");
            return fallback;
        }

        let outcome = statement.await;
        self.db_client.close_connection().await;

        match outcome {
            Ok(value) => value,
            Err(e) => {
                log_error(
                    &e,
                    &format!("Device {} failed [{}]", operation, e.category()),
                );
                fallback
            }
        }
    }

    async fn create_table(&self) -> Result<bool, DbError> {
        let mut slot = self.db_client.connection().await;
        let connection = slot.as_mut().ok_or(DbError::NotConnected)?;

        sqlx::query(CREATE_DEVICES_TABLE)
            .execute(connection)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        info!("Device schema initialized successfully");
        Ok(true)
    }

    async fn insert_row(&self, name: &str, kind: &str) -> Result<Option<i32>, DbError> {
        let mut slot = self.db_client.connection().await;
        let connection = slot.as_mut().ok_or(DbError::NotConnected)?;

        let result = sqlx::query(INSERT_DEVICE)
            .bind(name)
            .bind(kind)
            .bind(DeviceStatus::Available.as_str())
            .execute(connection)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        let id = i32::try_from(result.last_insert_id()).map_err(|_| {
            DbError::QueryError(format!(
                "generated device id {} does not fit an INT column",
                result.last_insert_id()
            ))
        })?;
        info!(device_id = id, "Device inserted");
        Ok(Some(id))
    }

    async fn set_status(&self, id: i32, status: DeviceStatus) -> Result<bool, DbError> {
        let mut slot = self.db_client.connection().await;
        let connection = slot.as_mut().ok_or(DbError::NotConnected)?;

        let result = sqlx::query(UPDATE_DEVICE_STATUS)
            .bind(status.as_str())
            .bind(id)
            .execute(connection)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_row(&self, id: i32) -> Result<bool, DbError> {
        let mut slot = self.db_client.connection().await;
        let connection = slot.as_mut().ok_or(DbError::NotConnected)?;

        let result = sqlx::query(DELETE_DEVICE)
            .bind(id)
            .execute(connection)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch_all(&self) -> Result<Vec<Device>, DbError> {
        let mut slot = self.db_client.connection().await;
        let connection = slot.as_mut().ok_or(DbError::NotConnected)?;

        let rows = sqlx::query(SELECT_DEVICES)
            .fetch_all(connection)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        rows.iter().map(device_from_row).collect()
    }

    async fn fetch_one(&self, id: i32) -> Result<Option<Device>, DbError> {
        let mut slot = self.db_client.connection().await;
        let connection = slot.as_mut().ok_or(DbError::NotConnected)?;

        let row = sqlx::query(SELECT_DEVICE_BY_ID)
            .bind(id)
            .fetch_optional(connection)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        row.as_ref().map(device_from_row).transpose()
    }

    async fn count_rows(&self) -> Result<i64, DbError> {
        let mut slot = self.db_client.connection().await;
        let connection = slot.as_mut().ok_or(DbError::NotConnected)?;

        sqlx::query_scalar::<_, i64>(COUNT_DEVICES)
            .fetch_one(connection)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))
    }
}

fn device_from_row(row: &MySqlRow) -> Result<Device, DbError> {
    let status: String = row.try_get("status")?;

    Ok(Device {
        id: row.try_get("device_id")?,
        name: row.try_get("name")?,
        kind: row.try_get("type")?,
        status: status.parse().map_err(DbError::QueryError)?,
    })
}

impl DeviceRepository for SqlDeviceRepository {
    async fn init_schema(&self) -> bool {
        debug!("Initializing device schema");
        self.run("init_schema", false, self.create_table()).await
    }

    async fn insert(&self, name: &str, kind: &str) -> Option<i32> {
        debug!("Inserting device {} of type {}", name, kind);
        self.run("insert", None, self.insert_row(name, kind)).await
    }

    async fn update(&self, id: i32) -> bool {
        debug!("Marking device {} busy", id);
        self.run("update", false, self.set_status(id, DeviceStatus::Busy))
            .await
    }

    async fn delete(&self, id: i32) -> bool {
        debug!("Deleting device {}", id);
        self.run("delete", false, self.delete_row(id)).await
    }

    async fn select(&self) -> Vec<String> {
        self.find_all()
            .await
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    async fn count(&self) -> i64 {
        self.run("count", 0, self.count_rows()).await
    }

    async fn find_all(&self) -> Vec<Device> {
        self.run("find_all", Vec::new(), self.fetch_all()).await
    }

    async fn find_by_id(&self, id: i32) -> Option<Device> {
        self.run("find_by_id", None, self.fetch_one(id)).await
    }
}
