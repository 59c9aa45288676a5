/// ORP (Optimal Recognition Point) anchor calculation
///
/// The anchor is the letter the reader's eye stays fixed on while words flash past.
/// Position is derived from the word length, counted in grapheme clusters:
/// - 0 graphemes → no anchor
/// - 1 grapheme → position 0
/// - 2-5 graphemes → position 1
/// - 6+ graphemes → floor(length * 0.3)
use unicode_segmentation::UnicodeSegmentation;

/// Returns the 0-based grapheme index of the anchor letter, or `None` for an empty word.
pub fn calculate_anchor_position(word: &str) -> Option<usize> {
    anchor_for_length(word.graphemes(true).count())
}

fn anchor_for_length(len: usize) -> Option<usize> {
    match len {
        0 => None,
        1 => Some(0),
        2..=5 => Some(1),
        // floor(len * 0.3) without going through floating point
        _ => Some(len * 3 / 10),
    }
}

/// A word split around its anchor: the text before, the anchor itself, and the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSegments {
    pub prefix: String,
    pub focus: String,
    pub suffix: String,
}

impl WordSegments {
    pub fn split(word: &str) -> Self {
        let graphemes: Vec<&str> = word.graphemes(true).collect();
        match anchor_for_length(graphemes.len()) {
            Some(anchor) => Self {
                prefix: graphemes[..anchor].concat(),
                focus: graphemes[anchor].to_string(),
                suffix: graphemes[anchor + 1..].concat(),
            },
            None => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.focus.is_empty() && self.suffix.is_empty()
    }

    pub fn word(&self) -> String {
        format!("{}{}{}", self.prefix, self.focus, self.suffix)
    }
}
