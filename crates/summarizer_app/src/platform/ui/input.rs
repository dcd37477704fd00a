/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Replace the input with this text and submit it.
    Submit(String),
    /// Submit whatever the input currently holds.
    Resubmit,
    /// Zero-based history index.
    Select(usize),
    /// Zero-based history index.
    Copy(usize),
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_line(line: &str) -> UiCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return UiCommand::Resubmit;
    }
    let Some(command) = trimmed.strip_prefix(':') else {
        return UiCommand::Submit(trimmed.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (name, arg) {
        ("q" | "quit", None) => UiCommand::Quit,
        ("h" | "help", None) => UiCommand::Help,
        ("s" | "select", Some(arg)) => match parse_index(arg) {
            Some(index) => UiCommand::Select(index),
            None => UiCommand::Invalid(format!("not a history number: {arg}")),
        },
        ("c" | "copy", Some(arg)) => match parse_index(arg) {
            Some(index) => UiCommand::Copy(index),
            None => UiCommand::Invalid(format!("not a history number: {arg}")),
        },
        _ => UiCommand::Invalid(format!("unknown command :{command}")),
    }
}

/// History numbers are shown starting at 1.
fn parse_index(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok()?.checked_sub(1)
}
