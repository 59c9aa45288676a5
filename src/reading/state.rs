use crate::engine::config::WPM_RANGE;
use crate::reading::timing::{wpm_to_period, PlaybackTimer};
use std::time::Instant;
use tracing::debug;

/// Playback controller: the word sequence, the current position and the playback timer.
///
/// Playing is represented by the presence of a timer, so "playing without a timer" and
/// "two timers" are unrepresentable. Every operation that starts the timer goes through
/// `arm_timer`, which cancels the previous one first.
///
/// Each operation returns `true` when the current index or the playing flag changed.
#[derive(Debug, Clone)]
pub struct ReadingState {
    words: Vec<String>,
    current_index: usize,
    wpm: u32,
    timer: Option<PlaybackTimer>,
}

impl ReadingState {
    pub fn new(words: Vec<String>, wpm: u32) -> Self {
        Self {
            words,
            current_index: 0,
            wpm: clamp_wpm(wpm),
            timer: None,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.current_index).map(String::as_str)
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    /// When the host loop must call `tick` next, if playing.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.as_ref().map(PlaybackTimer::next_due)
    }

    fn last_index(&self) -> usize {
        self.words.len().saturating_sub(1)
    }

    /// Swaps in a freshly tokenized sequence. Position goes back to the first word;
    /// playback continues unless the new sequence is empty.
    pub fn replace_words(&mut self, words: Vec<String>) -> bool {
        let was_playing = self.is_playing();
        self.words = words;
        self.current_index = 0;
        if self.words.is_empty() {
            self.cancel_timer();
        }
        debug!(
            words = self.words.len(),
            was_playing,
            playing = self.is_playing(),
            "word sequence replaced"
        );
        true
    }

    pub fn toggle_play(&mut self, now: Instant) -> bool {
        if self.words.is_empty() {
            debug!("toggle ignored: no words");
            return false;
        }

        if self.current_index >= self.last_index() {
            self.current_index = 0;
        }

        if self.is_playing() {
            self.cancel_timer();
            debug!(index = self.current_index, "paused");
        } else {
            self.arm_timer(now);
            debug!(index = self.current_index, wpm = self.wpm, "playing");
        }
        true
    }

    /// Handles at most one due tick. Call repeatedly until it returns `false`.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = match self.timer.as_mut() {
            Some(timer) => timer.take_due(now),
            None => false,
        };
        if !due {
            return false;
        }

        if self.current_index >= self.last_index() {
            self.cancel_timer();
            debug!(index = self.current_index, "reached last word");
        } else {
            self.current_index += 1;
        }
        true
    }

    pub fn reset(&mut self) -> bool {
        let was_playing = self.cancel_timer();
        let moved = self.current_index != 0;
        self.current_index = 0;
        was_playing || moved
    }

    /// Jumps to `floor(fraction * word_count)`, clamped to the sequence, and stops.
    pub fn seek(&mut self, fraction: f64) -> bool {
        let was_playing = self.cancel_timer();
        let previous = self.current_index;

        self.current_index = if self.words.is_empty() {
            0
        } else {
            let fraction = if fraction.is_nan() {
                0.0
            } else {
                fraction.clamp(0.0, 1.0)
            };
            let index = (fraction * self.words.len() as f64).floor() as usize;
            index.min(self.last_index())
        };

        debug!(fraction, index = self.current_index, "seek");
        was_playing || previous != self.current_index
    }

    /// Sets a new rate. A running timer is replaced by one at the new period, counted
    /// from `now`.
    pub fn change_rate(&mut self, wpm: u32, now: Instant) -> bool {
        let wpm = clamp_wpm(wpm);
        if wpm == self.wpm {
            return false;
        }
        self.wpm = wpm;
        if self.is_playing() {
            self.arm_timer(now);
            debug!(wpm, "timer restarted at new rate");
        }
        true
    }

    /// Cancels playback without moving. Used when the session goes away.
    pub fn stop(&mut self) -> bool {
        self.cancel_timer()
    }

    fn arm_timer(&mut self, now: Instant) {
        self.cancel_timer();
        self.timer = Some(PlaybackTimer::start(wpm_to_period(self.wpm), now));
    }

    /// Idempotent; returns whether a timer was running.
    fn cancel_timer(&mut self) -> bool {
        self.timer.take().is_some()
    }
}

fn clamp_wpm(wpm: u32) -> u32 {
    wpm.clamp(*WPM_RANGE.start(), *WPM_RANGE.end())
}
