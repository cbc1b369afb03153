//! Lockbox CLI - password-encrypted notes and small files
//!
//! This is the command-line interface for Lockbox. It drives the vault
//! operations in `lockbox-core` from a terminal.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod ui;

use clap::Parser;
use lockbox_core::VERSION;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{init, list, misc, save, unlock};
use crate::constants::{env, exit_codes};
use crate::errors::CliError;
use crate::ui::print_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx).await {
        let ui_ctx = ctx.ui_context(false);

        let (message, hint, code) = match e.downcast_ref::<CliError>() {
            Some(cli_err) => (
                cli_err.message().to_string(),
                cli_err.hint().map(str::to_string),
                cli_err.exit_code(),
            ),
            None => {
                let message = format!("{:#}", e);
                let hint = extract_error_hint(&message);
                (message, hint, exit_codes::GENERAL)
            }
        };

        print_error(&ui_ctx, &message, hint.as_deref());
        std::process::exit(code);
    }
}

/// Install the stderr log subscriber.
///
/// `LOCKBOX_LOG` takes standard filter directives; `--verbose` and
/// `--quiet` override it.
fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("lockbox_core=debug,lockbox_cli=debug")
    } else if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_env(env::LOG).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Contextual hints for errors that did not come through `CliError`.
fn extract_error_hint(error: &str) -> Option<String> {
    let error_lower = error.to_lowercase();

    if error_lower.contains("failed to parse config") {
        return Some("Fix the TOML syntax or run `lockbox init --force`.".to_string());
    }

    if error_lower.contains("home is not set") {
        return Some("Set LOCKBOX_CONFIG and --store to explicit paths.".to_string());
    }

    if error_lower.contains("no such file or directory") {
        return Some("Check the path and try again.".to_string());
    }

    None
}

async fn run(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    match &ctx.cli().command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Save(args)) => {
            save::handle_save(ctx, args).await?;
        }
        Some(Commands::List(args)) => {
            list::handle_list(ctx, args)?;
        }
        Some(Commands::Unlock(args)) => {
            unlock::handle_unlock(ctx, args).await?;
        }
        Some(Commands::Completions { shell }) => {
            misc::handle_completions(*shell)?;
        }
        None => {
            println!("lockbox {}", VERSION);
            println!("Run `lockbox --help` for usage.");
        }
    }

    Ok(())
}
