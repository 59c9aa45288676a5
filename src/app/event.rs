use crate::reading::StripClass;

/// Application events
#[derive(Debug, PartialEq, Clone)]
pub enum AppEvent {
    LoadFile(String),
    LoadClipboard,
    Quit,
    Help,
    Warning(String),
    InvalidCommand(String),
    TogglePlay,
    Reset,
    Seek(f64),
    AdjustWpm(i32),
    SetWpm(String),
    AdjustTextSize(i32),
    SetTextSize(String),
    ToggleTheme,
    SetTheme(String),
    SetColor(String),
    ToggleStrip(StripClass),
    ToggleSettings,
    EnterCommand,
    None,
}

/// Terminal-independent key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Up,
    Down,
    Other,
}
