//! Operator prompt commands.

use crate::types::FeedbackKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    /// Anything that is not a `:` command is an attribute goal.
    Goal(String),
    Feedback { kind: FeedbackKind, comment: Option<String> },
    Show,
    Help,
    Quit,
    Unknown(String),
}

impl PromptCommand {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix(':') else {
            return Self::Goal(line.to_owned());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (rest, None),
        };
        match name {
            "up" | "helpful" => Self::Feedback { kind: FeedbackKind::Positive, comment: arg.map(str::to_owned) },
            "down" | "not-helpful" => Self::Feedback { kind: FeedbackKind::Negative, comment: arg.map(str::to_owned) },
            "show" => Self::Show,
            "help" | "h" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

pub const HELP: &str = "\
Type an attribute goal and press enter to generate a filter clause.
  :up [comment]     mark the last result helpful
  :down [comment]   mark the last result not helpful
  :show             redraw the page
  :quit             exit";

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
