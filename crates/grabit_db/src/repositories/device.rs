//! Repository for inventory devices
//!
//! Every operation opens its own connection, runs one statement and closes
//! the connection again. Failures are logged and surface to the caller only
//! as a neutral value (`false`, `None`, an empty list or zero).

use crate::models::Device;

/// Repository for devices
///
/// This trait defines the interface for storing and retrieving devices in
/// the `devices` table.
pub trait DeviceRepository {
    /// Create the `devices` table if it doesn't exist yet
    ///
    /// # Returns
    ///
    /// `true` if the table is present afterwards
    fn init_schema(&self) -> impl std::future::Future<Output = bool> + Send;

    /// Insert a new device with status AVAILABLE
    ///
    /// # Arguments
    ///
    /// * `name` - The device name
    /// * `kind` - The device type
    ///
    /// # Returns
    ///
    /// The generated `device_id`, or `None` if nothing was inserted
    fn insert(
        &self,
        name: &str,
        kind: &str,
    ) -> impl std::future::Future<Output = Option<i32>> + Send;

    /// Mark a device BUSY
    ///
    /// # Returns
    ///
    /// `true` if a row with `id` exists
    fn update(&self, id: i32) -> impl std::future::Future<Output = bool> + Send;

    /// Delete a device
    ///
    /// # Returns
    ///
    /// `true` if a row was removed
    fn delete(&self, id: i32) -> impl std::future::Future<Output = bool> + Send;

    /// Every device rendered as `"<id> <name> <type> <status>"`, ordered by id
    fn select(&self) -> impl std::future::Future<Output = Vec<String>> + Send;

    /// Number of rows in the table
    fn count(&self) -> impl std::future::Future<Output = i64> + Send;

    /// Every device, ordered by id
    fn find_all(&self) -> impl std::future::Future<Output = Vec<Device>> + Send;

    /// Find a device by its id
    fn find_by_id(&self, id: i32) -> impl std::future::Future<Output = Option<Device>> + Send;
}
