use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use lockbox_core::unlock::FileDownload;
use lockbox_core::{
    LockboxError, RecordId, Revealed, UnlockFlow, UnlockOutcome, VaultIndex, VaultRecord,
    VaultStore,
};

use crate::app::AppContext;
use crate::cli::UnlockArgs;
use crate::constants::env;
use crate::errors::{CliError, ACCESS_DENIED};
use crate::helpers::{is_interactive, TerminalPrompt};
use crate::ui::{badge, print, receipt, Badge};

pub async fn handle_unlock(ctx: &AppContext<'_>, args: &UnlockArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let store = ctx.open_store()?;

    let subscription = store.subscribe().map_err(CliError::from)?;
    let index = VaultIndex::from_snapshot(subscription.current().to_vec());
    subscription.unsubscribe();
    let record = find_record(&index, &args.id)?.clone();

    let prompt = TerminalPrompt::new(is_interactive(args.no_input));
    if !prompt.can_answer() {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Set {}.",
            env::PASSWORD
        ))
        .into());
    }

    let mut flow = UnlockFlow::new(record);
    match flow.run(&prompt).await.map_err(CliError::from)? {
        UnlockOutcome::Cancelled => {
            if !ctx.quiet() {
                print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "Unlock cancelled"));
            }
        }
        UnlockOutcome::Denied => {
            return Err(CliError::auth_failed_with_hint(
                ACCESS_DENIED,
                "Check the password and run unlock again.",
            )
            .into());
        }
        UnlockOutcome::Revealed(Revealed::Message(text)) => {
            println!("{}", text.as_str());
        }
        UnlockOutcome::Revealed(Revealed::File(file)) => {
            let dir = args.out.clone().unwrap_or_else(|| PathBuf::from("."));
            let path = write_download(&dir, &file)?;
            if ctx.quiet() {
                println!("{}", path.display());
            } else {
                let path_display = path.display().to_string();
                let size = file.bytes.len().to_string();
                print(
                    &ui_ctx,
                    &receipt(
                        &ui_ctx,
                        "File decrypted",
                        &[
                            ("Path", path_display.as_str()),
                            ("Type", file.mime_type.as_str()),
                            ("Bytes", size.as_str()),
                        ],
                    ),
                );
            }
        }
    }
    Ok(())
}

/// Look a record up by full ID, then by unique prefix.
fn find_record<'a>(index: &'a VaultIndex, id: &str) -> anyhow::Result<&'a VaultRecord> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CliError::invalid_input("Record ID cannot be empty").into());
    }
    if let Some(record) = index.get(&RecordId::new(id)) {
        return Ok(record);
    }

    let matches: Vec<&VaultRecord> = index
        .records()
        .iter()
        .filter(|record| record.id.as_str().starts_with(id))
        .collect();
    match matches.as_slice() {
        [record] => Ok(*record),
        [] => Err(CliError::from(LockboxError::RecordNotFound(id.to_string())).into()),
        _ => Err(CliError::invalid_input(format!(
            "Record ID prefix {} is ambiguous ({} matches)",
            id,
            matches.len()
        ))
        .into()),
    }
}

/// Write a decrypted file without overwriting anything.
fn write_download(dir: &Path, file: &FileDownload) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", dir.display(), e))?;
    let path = dir.join(&file.filename);
    let mut out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", path.display(), e))?;
    out.write_all(&file.bytes)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_core::RecordKind;

    fn record(id: &str) -> VaultRecord {
        VaultRecord {
            id: RecordId::new(id),
            payload: "p".to_string(),
            kind: RecordKind::Text,
            user_tag: None,
            timestamp: None,
        }
    }

    fn index() -> VaultIndex {
        VaultIndex::from_snapshot(vec![
            record("0190aaaa-1"),
            record("0190aaaa-2"),
            record("0190bbbb-1"),
        ])
    }

    #[test]
    fn test_find_by_full_id_and_prefix() {
        let index = index();
        let full = find_record(&index, "0190aaaa-2").unwrap();
        assert_eq!(full.id.as_str(), "0190aaaa-2");
        let prefixed = find_record(&index, "0190b").unwrap();
        assert_eq!(prefixed.id.as_str(), "0190bbbb-1");
    }

    #[test]
    fn test_ambiguous_prefix_is_invalid_input() {
        let err = find_record(&index(), "0190aaaa").unwrap_err();
        let cli = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(cli.exit_code(), crate::constants::exit_codes::INVALID_INPUT);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let err = find_record(&index(), "ffff").unwrap_err();
        let cli = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(cli.exit_code(), crate::constants::exit_codes::NOT_FOUND);
    }
}
