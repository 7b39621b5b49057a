//! Path utilities.

use std::path::PathBuf;

use anyhow::Result;

/// Name of the application directory.
const APP_DIR: &str = "MindCare";

/// Get the base application directory (`MindCare`).
#[inline]
pub fn get_app_dir() -> Result<PathBuf> {
    let base_dir = match std::env::consts::OS {
        "windows" => std::env::var("APPDATA")
            .ok()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("Could not determine AppData directory"))?,
        "macos" => std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"))
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?,
        _ => std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?,
    };
    Ok(base_dir.join(APP_DIR))
}

/// Get the path of the optional `config.json`.
pub fn get_config_path() -> PathBuf {
    get_app_dir()
        .unwrap_or_else(|_| PathBuf::from(APP_DIR))
        .join("config.json")
}

/// Get the default path of the persisted credential.
pub fn get_credential_path() -> PathBuf {
    get_app_dir()
        .unwrap_or_else(|_| PathBuf::from(APP_DIR))
        .join("credential.json")
}
