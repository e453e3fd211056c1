//! orgtree: employee hierarchy builder and compensation/reporting-line validator
//!
//! Layers, innermost first:
//! - [`domain`]: employee records, the arena-backed forest, validation rules
//! - [`application`]: roster parsing and the directory service
//! - [`infrastructure`]: filesystem seam and service container
//! - [`cli`]: argument parsing, dispatch and terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
