//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Employee hierarchy builder and compensation/reporting-line validator
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory searched for .orgtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the hierarchy and the full validation report
    Report {
        /// Roster CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the hierarchy as a tree
    Tree {
        /// Roster CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print salary and reporting-depth violations
    Validate {
        /// Roster CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Exit with code 1 if any violation is found (for scripting)
        #[arg(long)]
        check: bool,
    },

    /// List the reports of one employee
    Reports {
        /// Roster CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Employee id
        id: String,
        /// Include indirect reports (whole subtree)
        #[arg(short, long)]
        all: bool,
    },

    /// Show validation details for one employee
    Show {
        /// Roster CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Employee id
        id: String,
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
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
