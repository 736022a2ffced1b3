//! CLI module
//!
//! Provides command-line interface for:
//! - serve: Load configuration and run the HTTP server
//! - token: Issue a development access token

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{load_config, run, run_command, serve, token, Config};
pub use errors::{CliError, CliResult};
