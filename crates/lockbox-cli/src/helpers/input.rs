use std::io::{self, IsTerminal, Read};
use std::path::Path;

use dialoguer::{Input, Password};
use zeroize::Zeroizing;

use lockbox_core::codec::{check_file_size, mime_for_path};
use lockbox_core::{Attachment, TagPolicy};

use crate::constants::env;
use crate::errors::CliError;

/// Prompts are allowed only on a terminal and without `--no-input`.
pub fn is_interactive(no_input: bool) -> bool {
    !no_input && io::stdin().is_terminal()
}

/// Password from LOCKBOX_PASSWORD, if set and non-empty.
pub fn env_password() -> Option<Zeroizing<String>> {
    std::env::var(env::PASSWORD)
        .ok()
        .filter(|value| !value.is_empty())
        .map(Zeroizing::new)
}

/// Password for a new record, from LOCKBOX_PASSWORD or a confirmed prompt.
///
/// Returns an empty password when neither is available; the save gate
/// reports it.
pub fn prompt_new_password(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = env_password() {
        return Ok(value);
    }
    if !interactive {
        return Ok(Zeroizing::new(String::new()));
    }
    Password::new()
        .with_prompt("Security password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .allow_empty_password(true)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Message text from `--text`, piped stdin, or a prompt.
///
/// Skipped entirely when a file is attached.
pub fn read_message(
    text: Option<String>,
    has_file: bool,
    interactive: bool,
) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = text {
        return Ok(Zeroizing::new(value));
    }
    if has_file {
        return Ok(Zeroizing::new(String::new()));
    }

    if !io::stdin().is_terminal() {
        let mut buffer = Zeroizing::new(String::new());
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = buffer.trim_end().to_string();
        return Ok(Zeroizing::new(trimmed));
    }

    if !interactive {
        return Ok(Zeroizing::new(String::new()));
    }
    Input::<String>::new()
        .with_prompt("Secret message")
        .allow_empty(true)
        .interact_text()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read message: {}", e))
}

/// Tag from `--tag`, or a prompt when the policy requires one.
pub fn read_tag(tag: Option<String>, policy: TagPolicy, interactive: bool) -> anyhow::Result<String> {
    if let Some(value) = tag {
        return Ok(value);
    }
    if !interactive || policy == TagPolicy::Optional {
        return Ok(String::new());
    }
    Input::<String>::new()
        .with_prompt("User tag")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read tag: {}", e))
}

/// Load a file for attachment, rejecting oversized files before reading them.
pub fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        CliError::not_found(
            format!("Cannot read {}: {}", path.display(), e),
            "Check the --file path.",
        )
    })?;
    if !metadata.is_file() {
        return Err(CliError::invalid_input(format!("{} is not a file", path.display())).into());
    }

    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    check_file_size(size).map_err(|e| CliError::invalid_input(e.to_string()))?;

    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    Attachment::new(name, mime_for_path(path), bytes)
        .map_err(|e| CliError::invalid_input(e.to_string()).into())
}
