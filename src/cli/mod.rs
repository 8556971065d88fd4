//! CLI module for the collator
//!
//! Provides command-line interface for:
//! - collate: NDJSON log in, history timeline out
//! - classify: one transaction's mutations in, event type out

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    classify, classify_value, collate, collate_log, execute, load_config, run, run_command,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_log, read_request, write_error, write_response};
