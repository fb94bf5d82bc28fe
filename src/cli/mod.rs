//! Command-line interface definition and dispatch for yuzu.
//!
//! Uses [`clap`] for argument parsing with derive macros. With no subcommand
//! yuzu starts the interactive chat.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::chat;
use crate::completion::CompletionClient;
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::format;
use crate::http::reqwest::ReqwestTransport;
use crate::provider::ProviderRegistry;
use crate::session::Session;

/// Top-level CLI structure for yuzu.
#[derive(Parser, Debug)]
#[command(name = "yuzu", version, about = "A multi-provider AI chat client")]
pub struct Cli {
    /// Directory for keys, profile, history and system prompt
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the yuzu CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session (default)
    Chat {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Send a single message and print the reply
    Ask {
        /// The message to send
        prompt: Vec<String>,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// List providers and their key state
    Providers,
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options shared by the commands that talk to a provider.
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    /// Stream tokens as they arrive
    #[arg(long, overrides_with = "no_stream")]
    pub stream: bool,
    /// Wait for the full reply even when config.toml enables streaming
    #[arg(long, overrides_with = "stream")]
    pub no_stream: bool,
    /// Provider to use (chutes, openrouter, cerebras)
    #[arg(short, long)]
    pub provider: Option<String>,
    /// Model to use, matched by substring
    #[arg(short, long)]
    pub model: Option<String>,
}

impl SessionArgs {
    /// Streaming mode after applying the flags to the config default.
    fn stream_enabled(&self, default: bool) -> bool {
        !self.no_stream && (self.stream || default)
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current config
    Show,
}

/// Parses command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir;
    }

    match cli.command.unwrap_or(Commands::Chat {
        session: SessionArgs::default(),
    }) {
        Commands::Chat { session: args } => {
            let stream = args.stream_enabled(config.stream);
            let session = open_session(&config, &args)?;
            chat::run_chat(session, build_client(&config)?, stream).await
        }
        Commands::Ask {
            prompt,
            session: args,
        } => {
            let prompt = prompt.join(" ");
            if prompt.trim().is_empty() {
                anyhow::bail!("No prompt provided. Usage: yuzu ask \"your question here\"");
            }
            let stream = args.stream_enabled(config.stream);
            let mut session = open_session(&config, &args)?;
            let client = build_client(&config)?;
            chat::exchange(&client, &mut session, &prompt, stream).await?;
            Ok(())
        }
        Commands::Providers => {
            let session = open_session(&config, &SessionArgs::default())?;
            for line in format::provider_lines(&session) {
                println!("{line}");
            }
            println!();
            println!(
                "{} {}",
                "Keys live in".dimmed(),
                session.paths().data_dir.display()
            );
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let path = Config::config_path()?;
                println!("{} {}", "Config path:".bold(), path.display());
                println!("{} {}", "Data dir:".bold(), config.data_dir()?.display());
                println!();
                println!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
        },
    }
}

/// Loads the registry and session, then applies `--provider`/`--model`.
fn open_session(config: &Config, args: &SessionArgs) -> Result<Session> {
    let paths = config.session_paths()?;
    let registry = ProviderRegistry::load(CredentialStore::new(&paths.data_dir), &config.provider);
    let mut session = Session::load(paths, registry);

    if let Some(ref id) = args.provider {
        session.switch_provider(id)?;
    }
    if let Some(ref fragment) = args.model {
        session.switch_model(fragment)?;
    }
    Ok(session)
}

fn build_client(config: &Config) -> Result<CompletionClient> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let transport =
        ReqwestTransport::with_timeout(timeout).context("Failed to create HTTP client")?;
    Ok(CompletionClient::new(Arc::new(transport), timeout))
}
