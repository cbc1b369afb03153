//! Path resolution for config and store files.

use std::path::{Path, PathBuf};

use crate::config::default_config_path;
use crate::constants::env;

/// Resolve the config file path, checking LOCKBOX_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Error message when the store file is missing.
pub fn missing_store_message(path: &Path) -> String {
    format!("No vault found at {}", path.display())
}

/// Error message when the config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!("Config file not found: {}", config_path.display())
}

/// Hint shown with either message above.
pub const INIT_HINT: &str =
    "Run `lockbox init`, or pass --store (LOCKBOX_STORE) to use another vault.";
