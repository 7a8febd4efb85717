//! Path helpers for the application folder.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Name of the application folder holding settings and logs.
const APP_DIR_NAME: &str = ".trade_chart";

/// Resolve the application folder: `.trade_chart` in the current working
/// directory if it already exists there, otherwise under the home directory.
fn resolve_app_dir(dir_name: &str) -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let local_path = cwd.join(dir_name);
    if local_path.exists() {
        return local_path;
    }

    let home_path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let app_path = home_path.join(dir_name);
    if !app_path.exists() {
        let _ = fs::create_dir_all(&app_path);
    }
    app_path
}

/// Application folder
pub static APP_DIR: LazyLock<PathBuf> = LazyLock::new(|| resolve_app_dir(APP_DIR_NAME));

/// Get path for a file inside the application folder.
pub fn get_file_path(filename: &str) -> PathBuf {
    APP_DIR.join(filename)
}

/// Get path for a subfolder inside the application folder, creating it if needed.
pub fn get_folder_path(folder_name: &str) -> PathBuf {
    let folder_path = APP_DIR.join(folder_name);
    if !folder_path.exists() {
        let _ = fs::create_dir_all(&folder_path);
    }
    folder_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path_is_under_app_dir() {
        let path = get_file_path("chart_setting.json");
        assert!(path.starts_with(&*APP_DIR));
        assert_eq!(path.file_name().unwrap(), "chart_setting.json");
    }

    #[test]
    fn test_folder_path_created() {
        let path = get_folder_path("log");
        assert!(path.exists());
    }
}
