use crate::engine::Config;
use crate::reading::{ReadingState, WordSegments};

/// Everything a display needs after a state change.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub segments: WordSegments,
    pub current_index: usize,
    pub word_count: usize,
    /// Percentage in `0.0..=100.0`; zero when there are no words.
    pub progress_percent: f64,
    /// Human readable position, e.g. `Word 3 of 120`
    pub counter: String,
    pub is_playing: bool,
    pub config: Config,
}

impl RenderState {
    pub fn from_reading_state(reading: &ReadingState, config: &Config) -> Self {
        let word_count = reading.word_count();
        let current_index = reading.current_index();
        let segments = reading
            .current_word()
            .map(WordSegments::split)
            .unwrap_or_default();

        let (progress_percent, counter) = if word_count == 0 {
            (0.0, "Word 0 of 0".to_string())
        } else {
            (
                (current_index + 1) as f64 / word_count as f64 * 100.0,
                format!("Word {} of {}", current_index + 1, word_count),
            )
        };

        Self {
            segments,
            current_index,
            word_count,
            progress_percent,
            counter,
            is_playing: reading.is_playing(),
            config: config.clone(),
        }
    }

    pub fn progress_fraction(&self) -> f64 {
        self.progress_percent / 100.0
    }
}

/// Receives the session's display updates.
pub trait RenderSink {
    fn render(&mut self, state: &RenderState);

    /// The session ended; the embedding surface should tear it down.
    fn session_closed(&mut self) {}
}

impl<F: FnMut(&RenderState)> RenderSink for F {
    fn render(&mut self, state: &RenderState) {
        self(state)
    }
}
