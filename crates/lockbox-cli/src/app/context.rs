//! Application context for the Lockbox CLI.
//!
//! Provides a unified context that combines CLI arguments with
//! lazily-loaded configuration.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use lockbox_core::crypto::CipherScheme;
use lockbox_core::{SqliteStore, TagPolicy};

use crate::cli::Cli;
use crate::config::{read_config, LockboxConfig};
use crate::errors::CliError;
use crate::ui::UiContext;

use super::resolver::{
    missing_config_message, missing_store_message, resolve_config_path, INIT_HINT,
};

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<LockboxConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color)
    }

    /// The config file, if one exists. Loaded once.
    pub fn config(&self) -> anyhow::Result<Option<&LockboxConfig>> {
        let config = self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if !path.exists() {
                return Ok::<_, anyhow::Error>(None);
            }
            read_config(&path).map(Some)
        })?;
        Ok(config.as_ref())
    }

    /// Store path from `--store`/`LOCKBOX_STORE`, then the config file.
    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = self.cli.store.as_ref() {
            return Ok(PathBuf::from(path));
        }
        match self.config()? {
            Some(config) => Ok(PathBuf::from(&config.store.path)),
            None => {
                let config_path = resolve_config_path()?;
                Err(CliError::not_found(
                    missing_config_message(&config_path),
                    INIT_HINT,
                )
                .into())
            }
        }
    }

    pub fn tag_policy(&self) -> anyhow::Result<TagPolicy> {
        Ok(self
            .config()?
            .map(|config| config.vault.tag_policy())
            .unwrap_or_default())
    }

    pub fn cipher_scheme(&self) -> anyhow::Result<CipherScheme> {
        Ok(self
            .config()?
            .map(|config| config.vault.cipher)
            .unwrap_or_default())
    }

    /// Open an existing store.
    pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
        let path = self.store_path()?;
        if !path.exists() {
            return Err(CliError::not_found(
                missing_store_message(&path),
                INIT_HINT,
            )
            .into());
        }
        SqliteStore::open(&path).map_err(|e| CliError::from(e).into())
    }
}
