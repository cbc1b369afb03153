use std::path::{Path, PathBuf};

use lockbox_core::crypto::CipherScheme;
use lockbox_core::TagPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct LockboxConfig {
    pub store: StoreSection,
    #[serde(default)]
    pub vault: VaultSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VaultSection {
    #[serde(default = "default_require_tag")]
    pub require_tag: bool,
    #[serde(default)]
    pub cipher: CipherScheme,
}

impl Default for VaultSection {
    fn default() -> Self {
        Self {
            require_tag: default_require_tag(),
            cipher: CipherScheme::default(),
        }
    }
}

fn default_require_tag() -> bool {
    true
}

impl VaultSection {
    pub fn tag_policy(&self) -> TagPolicy {
        if self.require_tag {
            TagPolicy::Required
        } else {
            TagPolicy::Optional
        }
    }
}

impl LockboxConfig {
    pub fn new(store_path: PathBuf, require_tag: bool, cipher: CipherScheme) -> Self {
        Self {
            store: StoreSection {
                path: store_path.to_string_lossy().to_string(),
            },
            vault: VaultSection {
                require_tag,
                cipher,
            },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("vault.sqlite3"))
}

pub fn read_config(path: &Path) -> anyhow::Result<LockboxConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &LockboxConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("lockbox"));
        }
    }
    Ok(home_dir()?.join(".config").join("lockbox"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("lockbox"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("lockbox"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
