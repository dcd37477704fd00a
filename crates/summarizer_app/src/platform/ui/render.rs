use summarizer_core::{AppViewModel, HistoryRowView};

use super::constants::*;

/// Renders the whole panel as terminal text.
pub fn render(view: &AppViewModel) -> String {
    let mut lines = Vec::new();

    lines.push(RULE.to_string());
    lines.push(TITLE.to_string());
    if view.input.is_empty() {
        lines.push(format!("> ({PROMPT})"));
    } else {
        lines.push(format!("> {}", view.input));
    }
    if let Some(message) = &view.input_error {
        lines.push(format!("! {message}"));
    }

    if !view.history.is_empty() {
        lines.push(String::new());
        lines.extend(view.history.iter().map(history_line));
    }

    lines.push(String::new());
    if view.loading {
        lines.push(LOADING_TEXT.to_string());
    } else if let Some(error) = &view.error {
        lines.push(ERROR_HEADLINE.to_string());
        lines.push(error.clone());
    } else if let Some(summary) = &view.summary {
        lines.push(SUMMARY_HEADING.to_string());
        lines.push(summary.clone());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn history_line(row: &HistoryRowView) -> String {
    let mark = if row.copied { COPIED_MARK } else { COPY_MARK };
    format!("{:>3}. {} {}", row.index + 1, mark, row.url)
}
