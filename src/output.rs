//! Output rendering abstraction for yuzu.
//!
//! Defines the [`Renderer`] trait that decouples streamed provider output
//! from the display layer. [`StdoutRenderer`] prints tokens directly to the
//! terminal as they arrive.

use colored::Colorize;
use std::io::{self, Write};

/// Receives incremental output of a streamed reply.
pub trait Renderer {
    /// Render a piece of content as it arrives.
    fn render_token(&mut self, token: &str);

    /// Called when the stream has ended.
    fn render_done(&mut self);

    /// Called when an error cuts the stream short.
    fn render_error(&mut self, err: &str);
}

/// Renders streaming output directly to stdout.
///
/// Each token is printed immediately with an explicit flush so the user
/// sees a "typing" effect. Buffers the raw text for accurate visual line
/// counting.
pub struct StdoutRenderer {
    buffer: String,
}

impl StdoutRenderer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Calculates the number of cursor-up movements needed to erase
    /// all streamed output (raw text + render_done output).
    ///
    /// Accounts for terminal line wrapping by using the actual terminal width.
    pub fn visual_line_count(&self) -> usize {
        let width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80)
            .max(1);

        let content_lines: usize = self
            .buffer
            .split('\n')
            .map(|line| {
                let len = line.chars().count();
                if len == 0 {
                    1
                } else {
                    len.div_ceil(width)
                }
            })
            .sum();

        // One cursor-up per line below the first, plus render_done's newline.
        content_lines.saturating_sub(1) + 1
    }
}

impl Default for StdoutRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for StdoutRenderer {
    fn render_token(&mut self, token: &str) {
        self.buffer.push_str(token);
        print!("{}", token);
        // Flush immediately so each token appears as it arrives
        io::stdout().flush().ok();
    }

    fn render_done(&mut self) {
        println!();
    }

    fn render_error(&mut self, err: &str) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), err);
    }
}
