//! Word placement for the reading area
//!
//! The focus letter always lands on the same column (the horizontal center of the
//! word area) so the eye never has to move between words. Text size maps to
//! letter spacing, since a terminal cannot change its font size.

pub mod view;

use crate::reading::WordSegments;
use ratatui::layout::Rect;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Spaces inserted between letters for a text size level.
pub fn letter_spacing(level: usize) -> usize {
    level / 2
}

/// Joins the graphemes of `text` with `spacing` spaces between each pair.
pub fn spaced(text: &str, spacing: usize) -> String {
    let gap = " ".repeat(spacing);
    text.graphemes(true).collect::<Vec<_>>().join(&gap)
}

/// Display width from the start of the word to the focus letter.
pub fn focus_offset(segments: &WordSegments, spacing: usize) -> usize {
    if segments.prefix.is_empty() {
        return 0;
    }
    // One gap separates the prefix from the focus letter.
    spaced(&segments.prefix, spacing).width() + spacing
}

/// Column where the focus letter is drawn.
pub fn anchor_column(area: Rect) -> u16 {
    area.x + area.width / 2
}

/// First column of the word so its focus letter sits on the anchor column.
pub fn start_column(area: Rect, segments: &WordSegments, spacing: usize) -> u16 {
    let offset = u16::try_from(focus_offset(segments, spacing)).unwrap_or(u16::MAX);
    anchor_column(area).saturating_sub(offset).max(area.x)
}
