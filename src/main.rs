//! Entry point for yuzu, a multi-provider AI chat client for the terminal.
//!
//! This binary loads environment variables, parses CLI arguments via [`cli`],
//! sets up logging, and dispatches to the chosen subcommand.

mod chat;
mod cli;
mod completion;
mod config;
mod constants;
mod credentials;
mod error;
mod format;
mod history;
mod http;
mod message;
mod output;
mod provider;
mod request;
mod session;
mod tokens;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();

    let default_filter = if cli.verbose { "yuzu=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli::run(cli).await
}
