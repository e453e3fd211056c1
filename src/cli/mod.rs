//! CLI layer: argument parsing, command dispatch and presentation

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod report;

pub use args::{Cli, Commands, ConfigCommands};
pub use commands::execute_command;
pub use error::{CliError, CliResult};
