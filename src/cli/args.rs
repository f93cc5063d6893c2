//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Binary tree node layer: size, copy and structurally assign trees stored as TOML
#[derive(Parser, Debug)]
#[command(name = "bnode")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(short = 'c', long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Upper bound on nodes per arena (overrides config)
    #[arg(long, global = true)]
    pub max_nodes: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count the nodes of a tree
    Size {
        /// Tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show a tree
    Show {
        /// Tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Deep-copy a tree
    Copy {
        /// Tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Write the copy here instead of showing it
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Reshape DEST to match SOURCE, reusing DEST's nodes
    Assign {
        /// Destination tree file
        #[arg(value_hint = ValueHint::FilePath)]
        dest: PathBuf,
        /// Source tree file
        #[arg(value_hint = ValueHint::FilePath)]
        source: PathBuf,
        /// Write the result here instead of showing it
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show global config file location
    Path,
}
