use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// assetforge - generate and cache cluster installation assets
#[derive(Parser, Debug)]
#[command(name = "assetforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (NDJSON events on stdout)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a target and write it into the install directory
    Create {
        /// Target to create (`manifests` or `cluster`)
        target: String,

        /// Install directory holding install-config.yaml
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// State directory (relative to --dir unless absolute)
        #[arg(long)]
        state_dir: Option<PathBuf>,

        /// Resolve dependencies one at a time
        #[arg(long)]
        sequential: bool,

        /// Keep transient assets after their consumers are generated
        #[arg(long)]
        no_purge: bool,
    },

    /// Inspect or reset persisted state
    State {
        #[command(subcommand)]
        action: StateAction,
    },

    /// Show the asset graph and the available targets
    Graph,
}

#[derive(Subcommand, Debug)]
pub enum StateAction {
    /// List stored records
    List {
        /// Install directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// State directory (relative to --dir unless absolute)
        #[arg(long)]
        state_dir: Option<PathBuf>,
    },

    /// Remove every stored record so the next run regenerates
    Clear {
        /// Install directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// State directory (relative to --dir unless absolute)
        #[arg(long)]
        state_dir: Option<PathBuf>,
    },
}
