use std::sync::Arc;

use lockbox_core::{LockboxError, Vault, VaultForm};

use crate::app::AppContext;
use crate::cli::SaveArgs;
use crate::errors::{CliError, SAVE_FAILED};
use crate::helpers::{is_interactive, prompt_new_password, read_attachment, read_message, read_tag};
use crate::ui::{print, receipt};

pub async fn handle_save(ctx: &AppContext<'_>, args: &SaveArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let interactive = is_interactive(args.no_input);
    let store = ctx.open_store()?;
    let tags = ctx.tag_policy()?;
    let scheme = match args.cipher {
        Some(scheme) => scheme,
        None => ctx.cipher_scheme()?,
    };

    let mut form = VaultForm::new();
    if let Some(path) = args.file.as_deref() {
        form = form.with_attachment(read_attachment(path)?);
    }
    let text = read_message(args.text.clone(), args.file.is_some(), interactive)?;
    let tag = read_tag(args.tag.clone(), tags, interactive)?;
    let password = prompt_new_password(interactive)?;
    let form = form
        .with_text(text.as_str())
        .with_tag(tag)
        .with_password(password.as_str());

    let vault = Vault::new(Arc::new(store))
        .with_scheme(scheme)
        .with_tag_policy(tags);
    let submission = vault.submit(form).await;
    let id = match submission.result {
        Ok(id) => id,
        Err(LockboxError::Storage(cause)) => {
            return Err(CliError::storage(SAVE_FAILED, cause).into());
        }
        Err(err) => return Err(CliError::from(err).into()),
    };

    if ctx.quiet() {
        println!("{}", id);
        return Ok(());
    }
    let kind = if args.file.is_some() { "file" } else { "text" };
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            "Saved",
            &[("ID", id.as_str()), ("Type", kind), ("Cipher", scheme.as_str())],
        ),
    );
    Ok(())
}
