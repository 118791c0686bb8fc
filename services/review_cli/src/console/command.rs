//! services/review_cli/src/console/command.rs
//!
//! Parses one line of console input into a user action.

use app_review_core::domain::{Platform, ViewMode};

/// A single user action typed at the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Click on the platform selector.
    SelectPlatform(Platform),
    /// Toggle between the table and the card grid.
    SetView(ViewMode),
    /// Click on the n-th example question (1-based).
    Example(usize),
    Retry,
    ListExamples,
    Reset,
    Help,
    Quit,
    /// Any other text is a question.
    Ask(String),
    /// A blank line.
    Nothing,
}

pub const HELP: &str = "\
Commands:
  android | ios     switch platform
  table | cards     switch view
  example <n>       ask the n-th example question
  examples          list example questions
  retry             retry the last question after an error
  reset             start a new session
  help              show this help
  quit              exit
Anything else is sent as a question.";

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match (word.to_ascii_lowercase().as_str(), rest.is_empty()) {
        ("", _) => Command::Nothing,
        ("android", true) => Command::SelectPlatform(Platform::Android),
        ("ios", true) => Command::SelectPlatform(Platform::Ios),
        ("table", true) => Command::SetView(ViewMode::Table),
        ("cards", true) => Command::SetView(ViewMode::Cards),
        ("retry", true) => Command::Retry,
        ("examples", true) => Command::ListExamples,
        ("reset", true) => Command::Reset,
        ("help", true) => Command::Help,
        ("quit", true) | ("exit", true) => Command::Quit,
        ("example", _) => {
            let position = rest
                .parse::<usize>()
                .map_err(|_| format!("usage: example <n>, got '{}'", rest))?;
            Command::Example(position)
        }
        _ => Command::Ask(line.to_string()),
    };
    Ok(command)
}
