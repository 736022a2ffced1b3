//! CLI-specific error types
//!
//! All CLI errors are fatal: `main` prints them and exits non-zero.

use std::io;

use thiserror::Error;

use crate::auth::AuthError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be read or parsed
    #[error("config error: {0}")]
    Config(String),

    /// Socket or terminal I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Token could not be issued
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}

impl CliError {
    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "DATAPOINT_CLI_CONFIG_ERROR",
            CliError::Io(_) => "DATAPOINT_CLI_IO_ERROR",
            CliError::Auth(_) => "DATAPOINT_CLI_AUTH_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CliError::config_error("bad").code(),
            "DATAPOINT_CLI_CONFIG_ERROR"
        );
        assert_eq!(
            CliError::from(io::Error::new(io::ErrorKind::AddrInUse, "taken")).code(),
            "DATAPOINT_CLI_IO_ERROR"
        );
    }

    #[test]
    fn test_display() {
        let err = CliError::config_error("missing field");
        assert_eq!(err.to_string(), "config error: missing field");
    }
}
