use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use lockbox_core::crypto::CipherScheme;
use lockbox_core::VERSION;

/// Lockbox - password-encrypted notes and small files
#[derive(Parser)]
#[command(name = "lockbox")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault store
    #[arg(short, long, global = true, env = "LOCKBOX_STORE")]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the store will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Allow saving records without a user tag
    #[arg(long)]
    pub optional_tags: bool,

    /// Cipher for new records (legacy or age)
    #[arg(long, value_name = "SCHEME")]
    pub cipher: Option<CipherScheme>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `save` command
#[derive(Args)]
pub struct SaveArgs {
    /// Secret message (overrides stdin/prompt)
    #[arg(long)]
    pub text: Option<String>,

    /// Attach a file (max 1 MB); takes precedence over the message
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Owner tag used to find the record later
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Cipher for this record (overrides config)
    #[arg(long, value_name = "SCHEME")]
    pub cipher: Option<CipherScheme>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Show only records whose tag contains this term
    #[arg(long)]
    pub tag: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `unlock` command
#[derive(Args)]
pub struct UnlockArgs {
    /// Record ID (full ID or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Directory to write a decrypted file into
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the config file and an empty store
    Init(InitArgs),

    /// Encrypt a message or file and save it
    Save(SaveArgs),

    /// List saved records
    List(ListArgs),

    /// Decrypt a record
    Unlock(UnlockArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}
