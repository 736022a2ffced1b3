//! CLI command implementations

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{JwtConfig, JwtManager, Role};
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::store::MemoryStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: HttpServerConfig,

    /// Token verification settings
    #[serde(default)]
    pub auth: JwtConfig,
}

/// Load the JSON configuration file.
///
/// A missing file yields the defaults; an unreadable or invalid one is an
/// error.
pub fn load_config(path: &Path) -> CliResult<Config> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(CliError::config_error(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_str(&content).map_err(|e| {
        CliError::config_error(format!("failed to parse {}: {}", path.display(), e))
    })
}

fn with_secret_override(mut config: Config, jwt_secret: Option<String>) -> Config {
    if let Some(secret) = jwt_secret {
        config.auth.secret = secret;
    }
    config
}

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command).await
}

/// Run a parsed command
pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve {
            config,
            port,
            jwt_secret,
        } => {
            let mut config = with_secret_override(load_config(&config)?, jwt_secret);
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Command::Token {
            config,
            role,
            subject,
            jwt_secret,
        } => {
            let config = with_secret_override(load_config(&config)?, jwt_secret);
            let subject = subject.unwrap_or_else(|| Uuid::new_v4().to_string());
            println!("{}", token(&config, &subject, role)?);
            Ok(())
        }
    }
}

/// Run the HTTP server over a fresh in-memory store
pub async fn serve(config: Config) -> CliResult<()> {
    if config.auth.uses_default_secret() {
        warn!("using the built-in JWT secret; set JWT_SECRET or auth.secret");
    }

    let server = HttpServer::new(
        config.server,
        JwtManager::new(config.auth),
        Arc::new(MemoryStore::new()),
    );
    info!(addr = %server.socket_addr(), "starting datapoint API");
    server.start().await?;
    Ok(())
}

/// Issue a signed token for `subject`
pub fn token(config: &Config, subject: &str, role: Role) -> CliResult<String> {
    let jwt = JwtManager::new(config.auth.clone());
    Ok(jwt.generate_token(subject, role)?)
}
