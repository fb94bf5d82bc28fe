//! Slash commands for the chat REPL.
//!
//! A line starting with `/` is parsed once into a [`Command`]; everything
//! else is a message. [`handle_command`] applies a command to the session
//! and returns a [`CommandAction`] so the loop can decide how to proceed.

use colored::Colorize;
use thiserror::Error;

use crate::format;
use crate::session::Session;

/// A parsed slash directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Key { provider: String, secret: String },
    RemoveKey { provider: String },
    Provider(String),
    Providers,
    Model(String),
    Models,
    System(SystemAction),
    Info,
    Stream,
    Clear,
    ClearHistory,
    Help,
    Exit,
}

/// Argument forms of `/system`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SystemAction {
    /// No argument: where the prompt lives and how to edit it.
    Hint,
    Show,
    Reload,
    Set(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum CommandError {
    #[error("usage: {usage}")]
    MissingArgument { usage: &'static str },

    #[error("unknown command: {0} (type /help for a list)")]
    Unknown(String),
}

/// Action returned by command handling.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CommandAction {
    Continue,
    Exit,
}

impl Command {
    /// Parses `line`. Returns `Ok(None)` for ordinary messages.
    pub(crate) fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if !line.starts_with('/') {
            return Ok(None);
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "/key" => {
                const USAGE: &str = "/key <provider> <api-key>";
                let (provider, secret) = rest
                    .split_once(char::is_whitespace)
                    .map(|(p, s)| (p, s.trim()))
                    .filter(|(_, s)| !s.is_empty())
                    .ok_or(CommandError::MissingArgument { usage: USAGE })?;
                Self::Key {
                    provider: provider.to_string(),
                    secret: secret.to_string(),
                }
            }
            "/removekey" => Self::RemoveKey {
                provider: required(rest, "/removekey <provider>")?,
            },
            "/provider" => Self::Provider(required(rest, "/provider <chutes|openrouter|cerebras>")?),
            "/providers" => Self::Providers,
            "/model" => Self::Model(required(rest, "/model <name or fragment>")?),
            "/models" => Self::Models,
            "/system" => Self::System(match rest {
                "" => SystemAction::Hint,
                "show" => SystemAction::Show,
                "reload" => SystemAction::Reload,
                text => SystemAction::Set(text.to_string()),
            }),
            "/info" => Self::Info,
            "/stream" => Self::Stream,
            "/clear" => Self::Clear,
            "/clearhistory" => Self::ClearHistory,
            "/help" | "/?" => Self::Help,
            "/exit" | "/quit" | "/bye" => Self::Exit,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };
        Ok(Some(command))
    }
}

fn required(rest: &str, usage: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { usage })
    } else {
        Ok(rest.to_string())
    }
}

/// Applies `command`. Failures are printed and the loop continues.
pub(crate) fn handle_command(
    command: Command,
    session: &mut Session,
    stream: &mut bool,
) -> CommandAction {
    match command {
        Command::Key { provider, secret } => match session.set_key(&provider, &secret) {
            Ok(kind) => {
                println!(
                    "{} API key saved for {} ({})",
                    "✓".green(),
                    kind.spec().name,
                    session.registry().key_path(kind).display().to_string().dimmed()
                );
                print_status(session);
            }
            Err(err) => print_error(err),
        },
        Command::RemoveKey { provider } => match session.remove_key(&provider) {
            Ok(kind) => {
                println!("{} API key removed for {}", "✓".green(), kind.spec().name);
                print_status(session);
            }
            Err(err) => print_error(err),
        },
        Command::Provider(id) => match session.switch_provider(&id) {
            Ok(kind) => println!(
                "{} Switched to {} ({})",
                "✓".green(),
                kind.spec().name.cyan(),
                session.model().yellow()
            ),
            Err(err) => print_error(err),
        },
        Command::Providers => {
            println!("{}", "Providers:".bold());
            for line in format::provider_lines(session) {
                println!("  {line}");
            }
        }
        Command::Model(fragment) => match session.switch_model(&fragment) {
            Ok(model) => println!("{} Model set to {}", "✓".green(), model.yellow()),
            Err(err) => print_error(err),
        },
        Command::Models => match session.current_provider() {
            Some(kind) => {
                println!("{} {}", "Models for".bold(), kind.spec().name.bold());
                for line in format::model_lines(kind, session.model()) {
                    println!("  {line}");
                }
            }
            None => print_error(crate::error::ChatError::NoProvider),
        },
        Command::System(action) => handle_system(action, session),
        Command::Info => print_status(session),
        Command::Stream => {
            *stream = !*stream;
            let mode = if *stream { "on" } else { "off" };
            println!("{} Streaming {}", "✓".green(), mode.cyan());
        }
        Command::Clear => {
            print!("\x1b[2J\x1b[H");
        }
        Command::ClearHistory => match session.clear_history() {
            Ok(()) => println!("{}", "History cleared.".dimmed()),
            Err(err) => print_error(err),
        },
        Command::Help => print_help(),
        Command::Exit => return CommandAction::Exit,
    }
    CommandAction::Continue
}

fn handle_system(action: SystemAction, session: &mut Session) {
    match action {
        SystemAction::Hint => {
            println!(
                "System prompt file: {}",
                session.paths().system_prompt.display().to_string().cyan()
            );
            println!(
                "{}",
                "Edit it and run /system reload, or set it with /system <text>.".dimmed()
            );
        }
        SystemAction::Show => {
            let text = session.system_prompt();
            if text.is_empty() {
                println!("{}", "No system prompt set.".dimmed());
            } else {
                println!("{}", format::system_prompt_header(text).bold());
                println!("{text}");
            }
        }
        SystemAction::Reload => match session.reload_system_prompt() {
            Ok(()) => println!(
                "{} {}",
                "✓".green(),
                format::system_prompt_header(session.system_prompt())
            ),
            Err(err) => print_error(err),
        },
        SystemAction::Set(text) => match session.set_system_prompt(&text) {
            Ok(()) => println!("{} System prompt updated", "✓".green()),
            Err(err) => print_error(err),
        },
    }
}

/// Prints the session summary.
pub(crate) fn print_status(session: &Session) {
    for (label, value) in format::summary_rows(&session.summary()) {
        println!("  {:<14} {}", format!("{label}:").dimmed(), value);
    }
}

fn print_error(err: impl std::fmt::Display) {
    eprintln!("{} {}", "error:".red().bold(), err);
}

fn print_help() {
    println!("{}", "Commands:".bold());
    let rows = [
        ("/key <provider> <api-key>", "save an API key"),
        ("/removekey <provider>", "delete an API key"),
        ("/provider <id>", "switch provider"),
        ("/providers", "list providers"),
        ("/model <fragment>", "switch model"),
        ("/models", "list models of the current provider"),
        ("/system [show|reload|text]", "manage the system prompt"),
        ("/info", "show session status"),
        ("/stream", "toggle streaming"),
        ("/clear", "clear the screen"),
        ("/clearhistory", "forget the conversation"),
        ("/help", "show this help"),
        ("/exit", "quit (or Ctrl+D)"),
    ];
    for (usage, description) in rows {
        println!("  {:<28} {}", usage.cyan(), description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::session_with_keys;

    #[test]
    fn test_plain_text_is_a_message() {
        assert_eq!(Command::parse("hello there"), Ok(None));
        assert_eq!(Command::parse("  what is /key?"), Ok(None));
    }

    #[test]
    fn test_parse_key_keeps_secret_whole() {
        assert_eq!(
            Command::parse("/key OpenRouter  sk-or v1 "),
            Ok(Some(Command::Key {
                provider: "OpenRouter".into(),
                secret: "sk-or v1".into(),
            }))
        );
    }

    #[test]
    fn test_missing_arguments_give_usage() {
        for line in ["/key", "/key chutes", "/removekey", "/provider", "/model  "] {
            assert!(
                matches!(Command::parse(line), Err(CommandError::MissingArgument { .. })),
                "{line}"
            );
        }
    }

    #[test]
    fn test_parse_system_forms() {
        assert_eq!(Command::parse("/system"), Ok(Some(Command::System(SystemAction::Hint))));
        assert_eq!(Command::parse("/system show"), Ok(Some(Command::System(SystemAction::Show))));
        assert_eq!(
            Command::parse("/system reload"),
            Ok(Some(Command::System(SystemAction::Reload)))
        );
        assert_eq!(
            Command::parse("/system Be terse."),
            Ok(Some(Command::System(SystemAction::Set("Be terse.".into()))))
        );
    }

    #[test]
    fn test_aliases() {
        for line in ["/exit", "/quit", "/bye", "/EXIT"] {
            assert_eq!(Command::parse(line), Ok(Some(Command::Exit)));
        }
        assert_eq!(Command::parse("/?"), Ok(Some(Command::Help)));
        assert_eq!(Command::parse("/model oss"), Ok(Some(Command::Model("oss".into()))));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Command::parse("/frobnicate now"),
            Err(CommandError::Unknown("/frobnicate".into()))
        );
    }

    #[test]
    fn test_handle_stream_toggle_and_exit() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with_keys(dir.path(), &[("cu.key", "k")]);
        let mut stream = false;
        assert_eq!(
            handle_command(Command::Stream, &mut session, &mut stream),
            CommandAction::Continue
        );
        assert!(stream);
        assert_eq!(
            handle_command(Command::Exit, &mut session, &mut stream),
            CommandAction::Exit
        );
    }

    #[test]
    fn test_handle_key_adopts_provider() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with_keys(dir.path(), &[]);
        let mut stream = false;
        handle_command(
            Command::Key {
                provider: "cerebras".into(),
                secret: "sk".into(),
            },
            &mut session,
            &mut stream,
        );
        assert_eq!(
            session.current_provider(),
            Some(crate::provider::ProviderKind::Cerebras)
        );
        assert!(dir.path().join("ce.key").exists());
    }

    #[test]
    fn test_handle_failures_leave_session_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with_keys(dir.path(), &[("cu.key", "k")]);
        let model = session.model().to_string();
        let mut stream = false;
        handle_command(Command::Provider("nope".into()), &mut session, &mut stream);
        handle_command(Command::Provider("cerebras".into()), &mut session, &mut stream);
        handle_command(Command::Model("no-such-model".into()), &mut session, &mut stream);
        assert_eq!(session.model(), model);
    }
}
