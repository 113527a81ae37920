//! assetforge CLI
//!
//! Usage: assetforge <COMMAND>
//!
//! Commands:
//!   create  Generate a target (`manifests` or `cluster`) into an install directory
//!   state   List or clear persisted assets
//!   graph   Show the asset graph and targets

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use assetforge::{CancellationToken, ForgeError, ResolveError};

use cli::{Cli, Commands, StateAction};
use commands::create::{cmd_create, CreateArgs};

/// Exit status used when the user interrupted generation
const EXIT_INTERRUPTED: i32 = 130;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("assetforge={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn install_interrupt_handler(token: &CancellationToken) {
    let token = token.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        eprintln!("\nInterrupted, stopping after the current asset...");
        token.cancel();
    }) {
        tracing::warn!(error = %err, "could not install Ctrl+C handler");
    }
}

fn run(cli: Cli, cancellation: CancellationToken) -> Result<()> {
    match cli.command {
        Commands::Create {
            target,
            dir,
            state_dir,
            sequential,
            no_purge,
        } => cmd_create(
            CreateArgs {
                target,
                dir,
                state_dir,
                sequential,
                no_purge,
            },
            cli.json,
            cancellation,
        ),
        Commands::State { action } => match action {
            StateAction::List { dir, state_dir } => {
                commands::state::cmd_state_list(dir, state_dir, cli.json)
            }
            StateAction::Clear { dir, state_dir } => {
                commands::state::cmd_state_clear(dir, state_dir, cli.json)
            }
        },
        Commands::Graph => commands::graph::cmd_graph(cli.json),
    }
}

fn was_cancelled(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ForgeError>(),
        Some(ForgeError::Resolve(resolve)) if is_cancellation(resolve)
    )
}

fn is_cancellation(err: &ResolveError) -> bool {
    match err {
        ResolveError::Cancelled { .. } => true,
        ResolveError::Dependency { error, .. } => is_cancellation(error),
        ResolveError::Aggregate(errors) => errors.iter().any(is_cancellation),
        _ => false,
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cancellation = CancellationToken::new();
    install_interrupt_handler(&cancellation);

    let json = cli.json;
    if let Err(err) = run(cli, cancellation) {
        ui::error::print_error(&err, json);
        let code = if was_cancelled(&err) { EXIT_INTERRUPTED } else { 1 };
        std::process::exit(code);
    }
}
