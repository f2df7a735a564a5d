//! Repository modules for database access

pub mod device;
pub mod device_factory;
pub mod device_sql;

// Re-export the device repository and factory for ease of use
pub use device::DeviceRepository;
pub use device_factory::DeviceRepositoryFactory;
pub use device_sql::SqlDeviceRepository;
