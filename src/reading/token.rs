use serde::{Deserialize, Serialize};

const PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];
const BRACKETS: &[char] = &['[', ']', '(', ')', '{', '}'];
const QUOTES: &[char] = &['\'', '"'];

/// Character classes removed from the source text before it is split into words.
///
/// The three classes are disjoint, so the order in which they are applied never matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripOptions {
    pub punctuation: bool,
    pub brackets: bool,
    pub quotes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripClass {
    Punctuation,
    Brackets,
    Quotes,
}

impl StripClass {
    pub fn chars(self) -> &'static [char] {
        match self {
            StripClass::Punctuation => PUNCTUATION,
            StripClass::Brackets => BRACKETS,
            StripClass::Quotes => QUOTES,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StripClass::Punctuation => "punctuation",
            StripClass::Brackets => "brackets",
            StripClass::Quotes => "quotes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "punctuation" | "punct" => Some(StripClass::Punctuation),
            "brackets" => Some(StripClass::Brackets),
            "quotes" => Some(StripClass::Quotes),
            _ => None,
        }
    }
}

impl StripOptions {
    pub fn is_enabled(&self, class: StripClass) -> bool {
        match class {
            StripClass::Punctuation => self.punctuation,
            StripClass::Brackets => self.brackets,
            StripClass::Quotes => self.quotes,
        }
    }

    pub fn toggle(&mut self, class: StripClass) {
        match class {
            StripClass::Punctuation => self.punctuation = !self.punctuation,
            StripClass::Brackets => self.brackets = !self.brackets,
            StripClass::Quotes => self.quotes = !self.quotes,
        }
    }

    fn strips(&self, c: char) -> bool {
        [StripClass::Punctuation, StripClass::Brackets, StripClass::Quotes]
            .into_iter()
            .any(|class| self.is_enabled(class) && class.chars().contains(&c))
    }
}

/// Splits text into display words.
///
/// Enabled character classes are removed first, then the remainder is split on runs of
/// Unicode whitespace. Empty or whitespace-only input yields no words.
pub fn tokenize_text(text: &str, strip: StripOptions) -> Vec<String> {
    let filtered: String = text.chars().filter(|&c| !strip.strips(c)).collect();
    filtered.split_whitespace().map(str::to_owned).collect()
}
