//! datapoint-api CLI entry point
//!
//! Installs the log subscriber, then hands off to `cli::run`. Errors are
//! printed to stderr and exit non-zero.

use datapoint_api::cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run().await {
        eprintln!("[{}] {}", e.code(), e);
        std::process::exit(1);
    }
}
