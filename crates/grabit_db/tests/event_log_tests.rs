// Event log file wiring through the factory.
//
// Installs the global subscriber, so it lives in its own test binary.

use grabit_config::AppConfig;
use grabit_db::{DeviceRepository, DeviceRepositoryFactory};
use std::fs;

#[tokio::test]
async fn test_app_config_repository_appends_to_event_log() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.database.host = "127.0.0.1".to_string();
    config.database.port = 1;
    config.logging.directory = dir.path().to_string_lossy().into_owned();

    let devices = DeviceRepositoryFactory::new()
        .from_app_config(&config)
        .expect("valid config");

    assert_eq!(devices.insert("scanner-1", "scanner").await, None);

    let contents = fs::read_to_string(dir.path().join(&config.logging.file_name))
        .expect("event log written");
    assert!(contents.contains("ERROR"));
    assert!(contents.contains("Cannot connect to Server"));
}
