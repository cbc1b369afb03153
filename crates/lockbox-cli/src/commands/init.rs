use std::path::PathBuf;

use lockbox_core::SqliteStore;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_store_path, write_config, LockboxConfig};
use crate::errors::CliError;
use crate::ui::{print, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ))
        .into());
    }

    let store_path = match args.path.as_ref().or(ctx.cli().store.as_ref()) {
        Some(path) => PathBuf::from(path),
        None => default_store_path()?,
    };
    let cipher = args.cipher.unwrap_or_default();
    let require_tag = !args.optional_tags;

    // Opening creates the file and its table
    SqliteStore::open(&store_path).map_err(CliError::from)?;
    write_config(
        &config_path,
        &LockboxConfig::new(store_path.clone(), require_tag, cipher),
    )?;

    if !ctx.quiet() {
        let store_display = store_path.display().to_string();
        let config_display = config_path.display().to_string();
        let tags = if require_tag { "required" } else { "optional" };
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Vault initialized",
                &[
                    ("Store", store_display.as_str()),
                    ("Config", config_display.as_str()),
                    ("Cipher", cipher.as_str()),
                    ("Tags", tags),
                ],
            ),
        );
    }
    Ok(())
}
