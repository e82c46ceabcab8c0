//! Plain-text rendering of the page for the terminal.

use std::fmt::Write;

use crate::page::PageState;
use crate::regions::{DisplayRegion, Explanation, PLACEHOLDER_SLOTS, SourceColumns};

const RULE: &str = "----------------------------------------";

#[must_use]
pub fn render_page(state: &PageState) -> String {
    let mut out = String::new();

    if state.loading {
        let progress = state.progress_message.as_deref().unwrap_or("Working...");
        let _ = writeln!(out, "[loading] {progress}");
        return out;
    }

    section(&mut out, "Attribute", &explanation_text(&state.regions.explanation));
    section(&mut out, "Filter clause", &state.regions.query_text.text());
    section(&mut out, "Audience size", &state.regions.row_count.text());
    section(&mut out, "Source columns", &source_columns_text(state));

    if state.feedback_controls_visible {
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "Was this helpful?  :up [comment]   :down [comment]");
    }
    if !state.feedback_message.is_empty() {
        let _ = writeln!(out, "{}", state.feedback_message);
    }
    out
}

fn section(out: &mut String, title: &str, body: &str) {
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{title}");
    if body.is_empty() {
        let _ = writeln!(out, "  -");
    } else {
        for line in body.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
}

fn explanation_text(explanation: &Explanation) -> String {
    match explanation {
        Explanation::Attribute { name, description } => format!("**{name}**\n{description}"),
        other => other.text(),
    }
}

fn source_columns_text(state: &PageState) -> String {
    match &state.regions.source_columns.view {
        SourceColumns::Placeholder => vec!["[ ]"; PLACEHOLDER_SLOTS].join(" "),
        _ => state.regions.source_columns.text(),
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
