// --- File: crates/grabit_common/src/lib.rs ---

pub mod logging; // Console + event log file setup

// Re-export logging utilities for easier access
pub use logging::{
    init, init_from_config, init_with_level, log_error, log_result, subscriber,
};
