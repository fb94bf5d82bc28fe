//! Interactive chat REPL for yuzu.
//!
//! Provides a multi-turn conversation loop using [`rustyline`] for readline
//! support (history, line editing). Slash commands are handled by
//! [`commands`]; every other line is sent through the [`CompletionClient`]
//! with the session's system prompt and recent history.

mod commands;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};

use crate::completion::{CompletionClient, Reply};
use crate::config::Config;
use crate::error::ChatError;
use crate::format;
use crate::output::StdoutRenderer;
use crate::session::Session;

use commands::{Command, CommandAction};

/// Runs the interactive chat REPL.
///
/// # Readline behavior
///
/// - **Ctrl+C**: cancels current input, stays in REPL
/// - **Ctrl+D**: exits cleanly with "goodbye."
/// - Readline history is persisted to `~/.cache/yuzu/readline_history.txt`
pub async fn run_chat(mut session: Session, client: CompletionClient, mut stream: bool) -> Result<()> {
    print_banner(&session, stream);

    let mut rl = DefaultEditor::new()?;
    let history_path = Config::cache_dir()?.join(crate::constants::READLINE_HISTORY_FILENAME);
    if history_path.exists() {
        let _ = rl.load_history(&history_path);
    }

    loop {
        match rl.readline(&format!("{} ", ">".green().bold())) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match Command::parse(line) {
                    Ok(Some(command)) => {
                        if commands::handle_command(command, &mut session, &mut stream)
                            == CommandAction::Exit
                        {
                            println!("{}", "goodbye.".dimmed());
                            break;
                        }
                    }
                    Ok(None) => {
                        if let Err(err) = exchange(&client, &mut session, line, stream).await {
                            eprintln!("{} {}", "error:".red().bold(), err);
                        }
                        println!();
                    }
                    Err(err) => eprintln!("{} {}", "?".yellow(), err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "goodbye.".dimmed());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}

/// Sends one message and prints the reply followed by its stats line.
pub async fn exchange(
    client: &CompletionClient,
    session: &mut Session,
    message: &str,
    stream: bool,
) -> Result<Reply, ChatError> {
    let provider = session.active_provider()?.spec().name;
    println!(
        "{}",
        format!("Thinking with {provider}/{}...", session.model()).dimmed()
    );

    let mut renderer = StdoutRenderer::new();
    let reply = client.send(session, message, stream, &mut renderer).await?;

    if stream {
        if !reply.interrupted && !reply.text.is_empty() {
            // Erase raw streamed output and reprint with formatting
            print!("\x1b[{}A\x1b[J", renderer.visual_line_count());
            io::stdout().flush().ok();
            println!("{}", format::render_markdown_lite(&reply.text));
        }
    } else {
        println!("{}", format::render_markdown_lite(&reply.text));
    }
    if reply.interrupted {
        println!("{}", "(response interrupted)".yellow());
    }
    println!("{}", format::format_stats(&reply.stats).dimmed());
    Ok(reply)
}

fn print_banner(session: &Session, stream: bool) {
    let registry = session.registry();
    println!(
        "{} [{}/{} providers enabled] [stream: {}] (/help for commands, Ctrl+D to exit)",
        "yuzu chat".bold().cyan(),
        registry.enabled_count(),
        registry.len(),
        if stream { "on" } else { "off" },
    );
    let enabled = session.list_enabled();
    if enabled.is_empty() {
        println!(
            "{}",
            "No API keys found. Add one with /key <provider> <api-key>.".yellow()
        );
    } else {
        let ids: Vec<&str> = enabled.iter().map(|kind| kind.id()).collect();
        println!("{} {}", "enabled:".dimmed(), ids.join(", "));
    }
    commands::print_status(session);
    println!();
}
