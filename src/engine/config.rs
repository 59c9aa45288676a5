// Reader configuration: the persisted settings record in typed form.
// Defaults and ranges match the browser reader the settings record is shared with.

use crate::reading::StripOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const WPM_RANGE: RangeInclusive<u32> = 100..=1000;
pub const DEFAULT_WPM: u32 = 300;
/// Step used by the rate slider and the +/- keys.
pub const WPM_STEP: u32 = 50;

/// Text sizes in pixels, indexed by the text size level.
pub const TEXT_SIZES: [u16; 6] = [32, 40, 48, 60, 72, 84];
pub const DEFAULT_TEXT_SIZE_LEVEL: usize = 3;
pub const MAX_TEXT_SIZE_LEVEL: usize = TEXT_SIZES.len() - 1;

pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#f87171";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `#RRGGBB` color string. Only constructible from valid input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HighlightColor(String);

impl HighlightColor {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let hex = input.strip_prefix('#')?;
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(input.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.0[range], 16).unwrap_or_default()
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl Default for HighlightColor {
    fn default() -> Self {
        Self(DEFAULT_HIGHLIGHT_COLOR.to_string())
    }
}

impl TryFrom<String> for HighlightColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("not a #RRGGBB color: {value}"))
    }
}

impl From<HighlightColor> for String {
    fn from(color: HighlightColor) -> Self {
        color.0
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reader settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Words per minute, always within `WPM_RANGE`
    pub wpm: u32,

    /// Index into `TEXT_SIZES`
    pub text_size_level: usize,

    pub theme: Theme,

    /// Color of the anchor letter
    pub highlight_color: HighlightColor,

    /// Character classes removed before tokenizing
    pub strip: StripOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM,
            text_size_level: DEFAULT_TEXT_SIZE_LEVEL,
            theme: Theme::default(),
            highlight_color: HighlightColor::default(),
            strip: StripOptions::default(),
        }
    }
}

impl Config {
    pub fn text_size_px(&self) -> u16 {
        TEXT_SIZES[self.text_size_level.min(MAX_TEXT_SIZE_LEVEL)]
    }
}

/// Accepts a user-entered rate only if it is numeric and inside `WPM_RANGE`.
pub fn parse_wpm(input: &str) -> Option<u32> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|wpm| WPM_RANGE.contains(wpm))
}

pub fn parse_text_size_level(input: &str) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|level| *level <= MAX_TEXT_SIZE_LEVEL)
}
