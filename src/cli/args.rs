//! CLI argument definitions using clap
//!
//! Commands:
//! - datapoint-api serve --config <path> [--port <port>]
//! - datapoint-api token --config <path> --role <user|admin> [--subject <id>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::auth::Role;

/// Datapoint API - REST service for meteorological sensor readings
#[derive(Parser, Debug)]
#[command(name = "datapoint-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./datapoint.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,

        /// Override the configured JWT secret
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,
    },

    /// Print a signed access token for local testing
    Token {
        /// Path to configuration file
        #[arg(long, default_value = "./datapoint.json")]
        config: PathBuf,

        /// Role granted by the token
        #[arg(long, default_value = "user")]
        role: Role,

        /// Caller id (default: random UUID)
        #[arg(long)]
        subject: Option<String>,

        /// Override the configured JWT secret
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["datapoint-api", "serve"]).unwrap();
        match cli.command {
            Command::Serve { config, port, .. } => {
                assert_eq!(config, PathBuf::from("./datapoint.json"));
                assert_eq!(port, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_token_role() {
        let cli =
            Cli::try_parse_from(["datapoint-api", "token", "--role", "admin", "--subject", "ops"])
                .unwrap();
        match cli.command {
            Command::Token { role, subject, .. } => {
                assert_eq!(role, Role::Admin);
                assert_eq!(subject.as_deref(), Some("ops"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(Cli::try_parse_from(["datapoint-api", "token", "--role", "root"]).is_err());
    }
}
