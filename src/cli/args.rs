//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::TreeSortType;

/// Temporal navigation trees: group dated manifests into decades, years, months and dates
#[derive(Parser, Debug)]
#[command(name = "navtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Additional config file, applied on top of the global config
    #[arg(long, global = true, env = "NAVTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the navigation tree of an item listing
    Tree {
        /// TOML item listing
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Presentation: none or date (default from config)
        #[arg(short, long)]
        sort: Option<TreeSortType>,
    },

    /// Report whether an item listing carries navigation dates
    Check {
        /// TOML item listing
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Inspect settings
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
