use crate::engine::{Config, HighlightColor, Theme};
use ratatui::style::Color;

/// Colors for one display theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub anchor: Color,
    pub dimmed: Color,
    pub surface: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::dark()
    }
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(26, 27, 38), // #1A1B26
            text: Color::Rgb(229, 231, 235),    // #E5E7EB
            anchor: Color::Rgb(248, 113, 113),  // #F87171
            dimmed: Color::Rgb(100, 110, 150),  // #646E96
            surface: Color::Rgb(36, 40, 59),    // #24283B
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(249, 250, 251), // #F9FAFB
            text: Color::Rgb(17, 24, 39),          // #111827
            anchor: Color::Rgb(248, 113, 113),
            dimmed: Color::Rgb(156, 163, 175), // #9CA3AF
            surface: Color::Rgb(229, 231, 235),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    /// Palette for a config, with the focus letter in its highlight color.
    pub fn from_config(config: &Config) -> Self {
        Self {
            anchor: highlight(&config.highlight_color),
            ..Self::for_theme(config.theme)
        }
    }
}

pub fn highlight(color: &HighlightColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}
