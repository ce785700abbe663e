//! CLI module for docstore
//!
//! Thin one-shot commands over a configured store:
//! - init: Create the data directory and document log
//! - put / get / update / delete: Single-document operations
//! - search: Type + attribute search

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
