//! Device inventory storage for GrabIt
//!
//! This crate manages the `devices` table in a MySQL database through SQLx.
//! Each repository operation opens a fresh connection, runs one parameterized
//! statement and closes the connection again. Connection and statement
//! failures are logged (see `grabit-common`) and never returned to callers.
//!
//! # Example
//!
//! ```rust,no_run
//! use grabit_config::load_config;
//! use grabit_db::{DeviceRepository, DeviceRepositoryFactory};
//!
//! async fn add_scanner() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config()?;
//!     let devices = DeviceRepositoryFactory::new().from_app_config(&config)?;
//!     if let Some(id) = devices.insert("scanner-01", "scanner").await {
//!         devices.update(id).await;
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod repositories;
pub mod repository;

pub use client::DbClient;
pub use error::DbError;
pub use models::{Device, DeviceStatus};
pub use repository::RepositoryFactory;

pub use repositories::{DeviceRepository, DeviceRepositoryFactory, SqlDeviceRepository};
