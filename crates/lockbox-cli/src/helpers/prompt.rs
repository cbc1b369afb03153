//! Terminal password prompt for the unlock flow.

use async_trait::async_trait;
use dialoguer::Password;

use lockbox_core::unlock::{PasswordPrompt, PromptResponse};
use lockbox_core::VaultRecord;

use super::input::env_password;

/// Answers password requests from LOCKBOX_PASSWORD or the terminal.
pub struct TerminalPrompt {
    interactive: bool,
}

impl TerminalPrompt {
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }

    /// Whether a password can be obtained at all.
    pub fn can_answer(&self) -> bool {
        self.interactive || env_password().is_some()
    }
}

#[async_trait]
impl PasswordPrompt for TerminalPrompt {
    async fn request_password(&self, record: &VaultRecord) -> PromptResponse {
        if let Some(value) = env_password() {
            return PromptResponse::from_input(value.to_string());
        }
        if !self.interactive {
            return PromptResponse::Cancelled;
        }

        let label = format!("Password for {}", record.id);
        let answer = tokio::task::spawn_blocking(move || {
            Password::new()
                .with_prompt(label)
                .allow_empty_password(true)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(input)) => PromptResponse::from_input(input),
            // Interrupted or closed input counts as abandoning the prompt
            _ => PromptResponse::Cancelled,
        }
    }
}
