//! Logging utilities for the GrabIt device inventory.
//!
//! Every event goes to two sinks: standard output and an append-only event
//! log file (`error_log.txt` by default). Lines carry a local timestamp, the
//! level, the target and the message.

use grabit_config::LoggingConfig;
use std::path::Path;
use std::str::FromStr;
use tracing::{error, info, Level, Subscriber};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging with the default level (INFO) and file location.
///
/// # Examples
///
/// ```no_run
/// use grabit_common::logging;
///
/// logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize logging with a specific level and the default file location.
pub fn init_with_level(level: Level) {
    let defaults = LoggingConfig::default();
    install(level, &defaults.directory, &defaults.file_name);
}

/// Initialize logging from the `[logging]` configuration section.
///
/// An unrecognised level falls back to INFO.
pub fn init_from_config(config: &LoggingConfig) {
    let level = Level::from_str(&config.level).unwrap_or(Level::INFO);
    install(level, &config.directory, &config.file_name);
}

fn install(level: Level, directory: &str, file_name: &str) {
    // RUST_LOG directives take precedence over the configured level
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = match build(filter, directory, file_name) {
        Ok(subscriber) => subscriber,
        Err(e) => {
            eprintln!("Failed to open event log {}/{}: {}", directory, file_name, e);
            return;
        }
    };

    // A global subscriber may already be set (tests, embedding applications)
    if subscriber.try_init().is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Build the console + file subscriber without installing it.
///
/// Only `level` decides what is recorded; `RUST_LOG` is not consulted. The
/// file is opened in append mode and never rotated.
pub fn subscriber(
    level: Level,
    directory: impl AsRef<Path>,
    file_name: &str,
) -> Result<impl Subscriber + Send + Sync + 'static, InitError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy("");

    build(filter, directory, file_name)
}

fn build(
    filter: EnvFilter,
    directory: impl AsRef<Path>,
    file_name: &str,
) -> Result<impl Subscriber + Send + Sync + 'static, InitError> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)?;

    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_timer(ChronoLocal::rfc_3339())
                .with_target(true),
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_timer(ChronoLocal::rfc_3339())
                .with_target(true),
        ))
}

/// Log an error with context at the ERROR level.
///
/// # Arguments
///
/// * `error` - The error to log.
/// * `context` - What was being attempted when the error occurred.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

/// Log a result, with different messages for success and error cases.
///
/// Success is logged at INFO with `success_message`, failure at ERROR with
/// `error_context` followed by the error.
///
/// # Returns
///
/// The original result, allowing this function to be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => log_error(e, error_context),
    }
    result
}
