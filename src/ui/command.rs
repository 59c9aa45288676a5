//! Command parsing for the TUI command deck
//!
//! Typed after pressing `:` in reading mode (the leading `:` is optional):
//! - `q` or `quit` → Quit
//! - `h` or `help` → Help
//! - `@filename.txt` → Load a plain text file
//! - `@@` → Load clipboard
//! - `wpm 450` → Set speed
//! - `size 2` → Set text size level
//! - `theme light` → Set theme
//! - `color #ff8800` → Set highlight color
//! - `strip quotes` → Toggle a strip class

use crate::app::AppEvent;
use crate::reading::StripClass;

/// Commands that can be parsed from command deck input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    Help,
    LoadFile(String),
    LoadClipboard,
    Wpm(String),
    Size(String),
    Theme(String),
    Color(String),
    Strip(String),
    Unknown(String),
}

/// Parse command deck input string into a Command
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();

    if input.is_empty() {
        return Command::Unknown(input.to_string());
    }

    if let Some(rest) = input.strip_prefix('@') {
        let filename = rest.trim();
        return if filename.is_empty() || filename == "@" {
            Command::LoadClipboard
        } else {
            Command::LoadFile(filename.to_string())
        };
    }

    let body = input.strip_prefix(':').unwrap_or(input);
    let (name, arg) = match body.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim().to_string()),
        None => (body, String::new()),
    };

    match (name, arg.is_empty()) {
        ("q" | "quit", true) => Command::Quit,
        ("h" | "help", true) => Command::Help,
        ("wpm" | "speed", false) => Command::Wpm(arg),
        ("size", false) => Command::Size(arg),
        ("theme", false) => Command::Theme(arg),
        ("color" | "colour", false) => Command::Color(arg),
        ("strip", false) => Command::Strip(arg),
        _ => Command::Unknown(input.to_string()),
    }
}

/// Convert a parsed command into an AppEvent
///
/// This is the translation layer between command deck input and App core.
pub fn command_to_app_event(command: Command) -> AppEvent {
    match command {
        Command::Quit => AppEvent::Quit,
        Command::Help => AppEvent::Help,
        Command::LoadFile(path) => AppEvent::LoadFile(path),
        Command::LoadClipboard => AppEvent::LoadClipboard,
        Command::Wpm(value) => AppEvent::SetWpm(value),
        Command::Size(value) => AppEvent::SetTextSize(value),
        Command::Theme(value) => AppEvent::SetTheme(value),
        Command::Color(value) => AppEvent::SetColor(value),
        Command::Strip(name) => match StripClass::from_name(&name) {
            Some(class) => AppEvent::ToggleStrip(class),
            None => AppEvent::Warning(format!(
                "Unknown strip class '{name}' (punctuation, brackets, quotes)"
            )),
        },
        Command::Unknown(input) => AppEvent::InvalidCommand(input),
    }
}
