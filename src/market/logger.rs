//! Logging setup for the charting client.

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::setting::SETTINGS;
use super::utility::get_folder_path;

/// Log level constants (integer levels as stored in settings)
pub const DEBUG: i32 = 10;
pub const INFO: i32 = 20;
pub const WARNING: i32 = 30;
pub const ERROR: i32 = 40;

/// Convert integer log level to tracing Level
pub fn level_from_int(level: i32) -> Level {
    match level {
        0..=10 => Level::DEBUG,
        11..=20 => Level::INFO,
        21..=30 => Level::WARN,
        _ => Level::ERROR,
    }
}

/// Initialize the logger from global settings.
///
/// Installs a console layer and/or a dated-file layer under the app folder.
/// Calling it twice is a no-op (the second init fails to install).
pub fn init_logger() {
    if !SETTINGS.get_bool("log.active").unwrap_or(true) {
        return;
    }

    let log_level = SETTINGS.get_int("log.level").unwrap_or(INFO as i64) as i32;
    let log_console = SETTINGS.get_bool("log.console").unwrap_or(true);
    let log_file = SETTINGS.get_bool("log.file").unwrap_or(true);

    let level = level_from_int(log_level);
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = tracing_subscriber::registry().with(filter);

    if log_console {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(true);

        if let Some(file) = log_file.then(open_log_file).flatten() {
            let file_layer = fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false);
            let _ = subscriber.with(console_layer).with(file_layer).try_init();
        } else {
            let _ = subscriber.with(console_layer).try_init();
        }
    } else if log_file {
        if let Some(file) = open_log_file() {
            let file_layer = fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false);
            let _ = subscriber.with(file_layer).try_init();
        }
    }
}

/// Open today's log file, creating the folder as needed.
fn open_log_file() -> Option<std::fs::File> {
    let log_path = get_log_file_path();
    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok()
}

/// Get the log file path for today
fn get_log_file_path() -> PathBuf {
    let log_folder = get_folder_path("log");
    let today = Local::now().format("%Y%m%d").to_string();
    let filename = format!("tc_{}.log", today);
    log_folder.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_int() {
        assert_eq!(level_from_int(DEBUG), Level::DEBUG);
        assert_eq!(level_from_int(INFO), Level::INFO);
        assert_eq!(level_from_int(WARNING), Level::WARN);
        assert_eq!(level_from_int(ERROR), Level::ERROR);
    }

    #[test]
    fn test_log_file_path_is_dated() {
        let path = get_log_file_path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("tc_"));
        assert!(name.ends_with(".log"));
    }
}
