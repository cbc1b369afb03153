//! Input helper functions for the CLI.
//!
//! - Password prompting and save form input (`input`)
//! - The terminal side of the unlock password request (`prompt`)

mod input;
mod prompt;

pub use input::{is_interactive, prompt_new_password, read_attachment, read_message, read_tag};
pub use prompt::TerminalPrompt;
