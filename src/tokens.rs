//! Token figures for throughput reporting.
//!
//! Blocking replies carry provider-reported usage counters. Streamed replies
//! carry none, so their token count is an estimate of one token per
//! [`CHARS_PER_TOKEN`] characters. It is an approximation, never ground truth.

use std::time::Duration;

use crate::completion::Usage;
use crate::constants::CHARS_PER_TOKEN;

/// Timing and token figures for one exchange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplyStats {
    /// Counters reported by the provider.
    Reported { elapsed: Duration, usage: Usage },
    /// Character-based estimate for streamed replies.
    Estimated { elapsed: Duration, tokens: u64 },
}

impl ReplyStats {
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Reported { elapsed, .. } | Self::Estimated { elapsed, .. } => *elapsed,
        }
    }

    /// Output tokens per second.
    pub fn tokens_per_second(&self) -> f64 {
        let tokens = match self {
            Self::Reported { usage, .. } => usage.completion_tokens,
            Self::Estimated { tokens, .. } => *tokens,
        };
        tokens_per_second(tokens, self.elapsed())
    }
}

/// Estimated token count of `text`: characters divided by four.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() / CHARS_PER_TOKEN) as u64
}

/// Throughput, zero when no time elapsed.
pub fn tokens_per_second(tokens: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= f64::EPSILON {
        0.0
    } else {
        tokens as f64 / secs
    }
}

/// Format a count with thousands separators. Example: "12,345"
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_is_chars_over_four() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 0);
        assert_eq!(estimate_tokens("Hi there"), 2);
        // Characters, not bytes.
        assert_eq!(estimate_tokens("ééééé"), 1);
    }

    #[test]
    fn test_tokens_per_second() {
        assert_eq!(tokens_per_second(100, Duration::from_secs(2)), 50.0);
        assert_eq!(tokens_per_second(100, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_reported_stats_use_completion_tokens() {
        let stats = ReplyStats::Reported {
            elapsed: Duration::from_secs(4),
            usage: Usage {
                prompt_tokens: 1000,
                completion_tokens: 80,
                total_tokens: 1080,
            },
        };
        assert_eq!(stats.tokens_per_second(), 20.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
