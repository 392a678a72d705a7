//! Terminal output for the interactive shell.
//!
//! Replies go to stdout; prompts, status and diagnostics go to stderr.

use crossterm::style::{Color, Stylize};

use crate::quota::RemainingQuota;
use crate::types::StructuredReply;

/// Shown when a reply carries a `step` but no usable text.
pub const UNPROCESSED_REPLY: &str =
    "I couldn't process that weather query properly. Please try again.";

const LABEL_AGENT: &str = "weatherbuddy";
const LABEL_WARNING: &str = "warning:";
const LABEL_ERROR: &str = "error:";
const PROMPT_SYMBOL: &str = "›";
const PROMPT_PLAIN: &str = "> ";
const INDENT: &str = "  ";

/// Handles all terminal output formatting.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Print the user input prompt indicator (to stderr).
    pub fn prompt(&self) {
        if self.color {
            eprint!("{} ", PROMPT_SYMBOL.with(Color::Cyan).bold());
        } else {
            eprint!("{PROMPT_PLAIN}");
        }
    }

    /// Print the banner line with model and build metadata.
    pub fn header(&self, model: &str, build: &str) {
        if self.color {
            eprintln!(
                "{} {} {}",
                LABEL_AGENT.with(Color::Cyan).bold(),
                model.with(Color::Magenta),
                build.with(Color::DarkGrey),
            );
        } else {
            eprintln!("{LABEL_AGENT} ({model}) {build}");
        }
    }

    /// Print the assistant's reply text (to stdout).
    pub fn assistant_message(&self, content: &str) {
        if self.color {
            println!("{}", content.with(Color::White));
        } else {
            println!("{content}");
        }
    }

    /// Print a key/value line (to stderr).
    pub fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "{INDENT}{} {}",
                format!("{key}:").with(Color::DarkGrey),
                value.with(Color::Grey),
            );
        } else {
            eprintln!("{INDENT}{key}: {value}");
        }
    }

    /// Print a muted informational line (to stderr).
    pub fn info(&self, msg: &str) {
        if self.color {
            eprintln!("{}", msg.with(Color::DarkGrey));
        } else {
            eprintln!("{msg}");
        }
    }

    pub fn warn(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_WARNING.with(Color::Yellow).bold());
        } else {
            eprintln!("{LABEL_WARNING} {msg}");
        }
    }

    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_ERROR.with(Color::Red).bold());
        } else {
            eprintln!("{LABEL_ERROR} {msg}");
        }
    }
}

/// Text to show for a reply.
pub fn reply_text(reply: &StructuredReply) -> &str {
    if reply.content.trim().is_empty() && reply.step.is_some() {
        UNPROCESSED_REPLY
    } else {
        &reply.content
    }
}

/// Footer describing what the caller has left.
pub fn quota_line(remaining: RemainingQuota) -> String {
    match remaining {
        RemainingQuota::Unlimited => "Using your API key: unlimited access".to_string(),
        RemainingQuota::Limited(1) => "1 free query remaining".to_string(),
        RemainingQuota::Limited(n) => format!("{n} free queries remaining"),
    }
}
