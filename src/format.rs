//! Plain-text formatting for replies, stats lines and status displays.
//!
//! Functions here return uncolored text (except the markdown renderer) so
//! the REPL decides how to style them.

use colored::Colorize;

use crate::provider::ProviderKind;
use crate::session::{line_count, Session, Summary};
use crate::tokens::{format_number, ReplyStats};

/// Minimal markdown renderer for terminal output.
/// Not a full parser. Handles bold, inline code, and fenced code blocks.
pub fn render_markdown_lite(text: &str) -> String {
    let mut output = String::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if let Some(fence) = line.strip_prefix("```") {
            if in_code_block {
                output.push('\n');
            } else {
                let lang = fence.trim();
                if !lang.is_empty() {
                    output.push_str(&format!("  {}\n", lang.dimmed()));
                }
            }
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            output.push_str(&format!("  {}\n", line.cyan()));
        } else {
            output.push_str(&render_inline(line));
            output.push('\n');
        }
    }

    if output.ends_with('\n') {
        output.pop();
    }
    output
}

/// Handle **bold** and `inline code` within a single line.
fn render_inline(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut result = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i..].starts_with(&['*', '*']) {
            if let Some(end) = find_pair(&chars, i + 2, ['*', '*']) {
                let bold: String = chars[i + 2..end].iter().collect();
                result.push_str(&bold.bold().to_string());
                i = end + 2;
                continue;
            }
        }
        if chars[i] == '`' {
            if let Some(offset) = chars[i + 1..].iter().position(|c| *c == '`') {
                let end = i + 1 + offset;
                let code: String = chars[i + 1..end].iter().collect();
                result.push_str(&code.cyan().to_string());
                i = end + 1;
                continue;
            }
        }
        result.push(chars[i]);
        i += 1;
    }
    result
}

fn find_pair(chars: &[char], start: usize, pair: [char; 2]) -> Option<usize> {
    chars
        .get(start..)?
        .windows(2)
        .position(|w| w == pair)
        .map(|offset| start + offset)
}

/// Stats line printed after a reply.
///
/// Blocking: `1.25s | 12→34 tokens | 27.2 t/s`.
/// Streaming: `1.25s | ~27.2 t/s (estimated)`.
pub fn format_stats(stats: &ReplyStats) -> String {
    let elapsed = format!("{:.2}s", stats.elapsed().as_secs_f64());
    let rate = stats.tokens_per_second();
    match stats {
        ReplyStats::Reported { usage, .. } => format!(
            "{elapsed} | {}→{} tokens | {rate:.1} t/s",
            format_number(usage.prompt_tokens),
            format_number(usage.completion_tokens),
        ),
        ReplyStats::Estimated { .. } => format!("{elapsed} | ~{rate:.1} t/s (estimated)"),
    }
}

/// Label/value rows of the status display.
pub fn summary_rows(summary: &Summary) -> Vec<(&'static str, String)> {
    let provider = match summary.provider {
        Some(kind) => format!("{} ({})", kind.spec().name, kind.spec().key_file),
        None => "none (add a key with /key)".to_string(),
    };
    let system = match summary.system_prompt_lines {
        0 => "none".to_string(),
        1 => "1 line".to_string(),
        n => format!("{n} lines"),
    };
    vec![
        ("Provider", provider),
        ("Model", summary.model.clone()),
        ("System prompt", system),
        ("Exchanges", summary.exchanges.to_string()),
        (
            "Providers",
            format!("{}/{} enabled", summary.enabled_providers, summary.total_providers),
        ),
        (
            "Context",
            format!("~{} chars", format_number(summary.context_chars as u64)),
        ),
    ]
}

/// Header line for `/system show`.
pub fn system_prompt_header(text: &str) -> String {
    format!(
        "System prompt ({} lines, {} chars)",
        line_count(text),
        format_number(text.chars().count() as u64)
    )
}

/// One line per catalog provider; `*` marks the current one.
pub fn provider_lines(session: &Session) -> Vec<String> {
    session
        .registry()
        .iter()
        .map(|provider| {
            let marker = marker(session.current_provider() == Some(provider.kind));
            let state = if provider.is_enabled() {
                "enabled".to_string()
            } else {
                format!("no key ({})", provider.spec().key_file)
            };
            format!(
                "{marker} {:<11} {:<11} {state}",
                provider.kind.id(),
                provider.spec().name
            )
        })
        .collect()
}

/// One line per model of `kind`; `*` marks `current`.
pub fn model_lines(kind: ProviderKind, current: &str) -> Vec<String> {
    kind.spec()
        .models
        .iter()
        .map(|model| format!("{} {model}", marker(*model == current)))
        .collect()
}

fn marker(current: bool) -> &'static str {
    if current {
        "*"
    } else {
        " "
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Usage;
    use std::time::Duration;

    #[test]
    fn test_stats_reported() {
        let stats = ReplyStats::Reported {
            elapsed: Duration::from_millis(2000),
            usage: Usage {
                prompt_tokens: 1200,
                completion_tokens: 50,
                total_tokens: 1250,
            },
        };
        assert_eq!(format_stats(&stats), "2.00s | 1,200→50 tokens | 25.0 t/s");
    }

    #[test]
    fn test_stats_estimated_is_labelled() {
        let stats = ReplyStats::Estimated {
            elapsed: Duration::from_secs(4),
            tokens: 10,
        };
        assert_eq!(format_stats(&stats), "4.00s | ~2.5 t/s (estimated)");
    }

    #[test]
    fn test_summary_rows() {
        let summary = Summary {
            provider: Some(ProviderKind::Cerebras),
            model: "llama-3.3-70b".into(),
            system_prompt_lines: 2,
            exchanges: 3,
            enabled_providers: 2,
            total_providers: 3,
            context_chars: 4321,
        };
        let rows = summary_rows(&summary);
        assert_eq!(rows[0], ("Provider", "Cerebras (ce.key)".to_string()));
        assert_eq!(rows[2].1, "2 lines");
        assert_eq!(rows[4].1, "2/3 enabled");
        assert_eq!(rows[5].1, "~4,321 chars");
    }

    #[test]
    fn test_summary_without_provider() {
        let summary = Summary {
            provider: None,
            model: String::new(),
            system_prompt_lines: 0,
            exchanges: 0,
            enabled_providers: 0,
            total_providers: 3,
            context_chars: 0,
        };
        let rows = summary_rows(&summary);
        assert!(rows[0].1.starts_with("none"));
        assert_eq!(rows[2].1, "none");
    }

    #[test]
    fn test_system_prompt_header_counts() {
        assert_eq!(system_prompt_header("a\nbc"), "System prompt (2 lines, 4 chars)");
        assert_eq!(system_prompt_header(""), "System prompt (0 lines, 0 chars)");
    }

    #[test]
    fn test_model_lines_mark_current() {
        let lines = model_lines(ProviderKind::Cerebras, "llama-3.3-70b");
        let marked: Vec<&String> = lines.iter().filter(|l| l.starts_with('*')).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].ends_with("llama-3.3-70b"));
    }

    #[test]
    fn test_markdown_plain_text_passes_through() {
        colored::control::set_override(false);
        assert_eq!(render_markdown_lite("hello\nworld"), "hello\nworld");
        assert_eq!(render_markdown_lite("a **b** `c`"), "a b c");
        assert_eq!(render_markdown_lite("```rust\nlet x = 1;\n```"), "  rust\n  let x = 1;\n");
        assert_eq!(render_markdown_lite("unclosed **bold"), "unclosed **bold");
    }
}
