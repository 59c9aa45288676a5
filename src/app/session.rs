//! Reading session
//!
//! A session owns everything that changes while someone reads: the source text, the
//! configuration, the playback controller, the settings store and the display sink.
//! All mutation goes through the methods here, and each one that changes what is on
//! screen ends with exactly one render.

use super::render_state::{RenderSink, RenderState};
use crate::engine::config::{parse_wpm, HighlightColor, Theme, MAX_TEXT_SIZE_LEVEL, WPM_RANGE};
use crate::engine::Config;
use crate::reading::{tokenize_text, ReadingState, StripClass, StripOptions};
use crate::settings::{
    apply_value, ChangeFeed, SettingChange, SettingField, SettingsPatch, SettingsStore,
};
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct Session {
    text: String,
    config: Config,
    reading: ReadingState,
    store: Box<dyn SettingsStore>,
    feed: ChangeFeed,
    sink: Box<dyn RenderSink>,
    closed: bool,
}

impl Session {
    /// Loads the stored configuration, subscribes to external changes and renders the
    /// empty session.
    pub fn new(mut store: Box<dyn SettingsStore>, sink: Box<dyn RenderSink>) -> Self {
        let config = store.load();
        let feed = store.subscribe();
        let reading = ReadingState::new(Vec::new(), config.wpm);
        info!(wpm = config.wpm, theme = %config.theme, "session started");

        let mut session = Self {
            text: String::new(),
            config,
            reading,
            store,
            feed,
            sink,
            closed: false,
        };
        session.render();
        session
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reading(&self) -> &ReadingState {
        &self.reading
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn render_state(&self) -> RenderState {
        RenderState::from_reading_state(&self.reading, &self.config)
    }

    /// When the host must call `tick` next, if anything is playing.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.reading.next_deadline()
    }

    /// Replaces the source text. Position returns to the first word.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if self.closed {
            return;
        }
        self.text = text.into();
        self.retokenize();
        info!(words = self.reading.word_count(), "text loaded");
        self.render();
    }

    pub fn toggle_play(&mut self, now: Instant) {
        if self.closed {
            return;
        }
        if self.reading.toggle_play(now) {
            self.render();
        }
    }

    pub fn reset(&mut self) {
        if self.reading.reset() {
            self.render();
        }
    }

    pub fn seek(&mut self, fraction: f64) {
        if self.reading.seek(fraction) {
            self.render();
        }
    }

    /// Delivers every tick due by `now`, rendering after each one.
    pub fn tick(&mut self, now: Instant) {
        if self.closed {
            return;
        }
        while self.reading.tick(now) {
            self.render();
        }
    }

    /// Sets the rate from user input. Out-of-range values are ignored.
    pub fn set_wpm(&mut self, wpm: u32, now: Instant) -> bool {
        if !WPM_RANGE.contains(&wpm) {
            debug!(wpm, "rejected rate outside range");
            return false;
        }
        self.apply_wpm(wpm, now);
        true
    }

    /// Parses a typed rate. Non-numeric or out-of-range input is ignored.
    pub fn set_wpm_input(&mut self, input: &str, now: Instant) -> bool {
        match parse_wpm(input) {
            Some(wpm) => self.set_wpm(wpm, now),
            None => {
                debug!(input, "rejected rate input");
                false
            }
        }
    }

    /// Moves the rate by `delta`, stopping at the ends of the range.
    pub fn adjust_wpm(&mut self, delta: i32, now: Instant) {
        let wpm = (self.config.wpm as i64 + delta as i64)
            .clamp(*WPM_RANGE.start() as i64, *WPM_RANGE.end() as i64) as u32;
        self.apply_wpm(wpm, now);
    }

    pub fn set_text_size_level(&mut self, level: usize) -> bool {
        if level > MAX_TEXT_SIZE_LEVEL {
            debug!(level, "rejected text size level");
            return false;
        }
        if self.config.text_size_level != level {
            self.config.text_size_level = level;
            self.persist(SettingsPatch::text_size_level(level));
            self.render();
        }
        true
    }

    pub fn adjust_text_size(&mut self, delta: i32) {
        let level = (self.config.text_size_level as i64 + delta as i64)
            .clamp(0, MAX_TEXT_SIZE_LEVEL as i64) as usize;
        self.set_text_size_level(level);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.config.theme != theme {
            self.config.theme = theme;
            self.persist(SettingsPatch::theme(theme));
            self.render();
        }
    }

    /// Accepts `#RRGGBB` only; anything else leaves the current color in place.
    pub fn set_highlight_color(&mut self, input: &str) -> bool {
        let Some(color) = HighlightColor::parse(input) else {
            debug!(input, "rejected highlight color");
            return false;
        };
        if self.config.highlight_color != color {
            self.config.highlight_color = color.clone();
            self.persist(SettingsPatch::highlight_color(color));
            self.render();
        }
        true
    }

    pub fn set_strip_options(&mut self, strip: StripOptions) {
        if self.config.strip == strip {
            return;
        }
        self.config.strip = strip;
        self.persist(SettingsPatch::strip(strip));
        self.retokenize();
        self.render();
    }

    pub fn toggle_strip(&mut self, class: StripClass) {
        let mut strip = self.config.strip;
        strip.toggle(class);
        self.set_strip_options(strip);
    }

    /// Applies settings changed by other surfaces.
    ///
    /// A rate change keeps the position and restarts a running timer; a strip change
    /// re-tokenizes; everything else only affects rendering.
    pub fn sync_external(&mut self, now: Instant) {
        if self.closed {
            return;
        }
        self.store.poll();
        let changes: Vec<SettingChange> = self.feed.pending().collect();
        for change in changes {
            self.apply_external(change, now);
        }
    }

    fn apply_external(&mut self, change: SettingChange, now: Instant) {
        debug!(key = change.field.key(), value = %change.value, "external setting change");
        let before = self.config.clone();
        apply_value(&mut self.config, change.field, &change.value);

        match change.field {
            SettingField::Wpm if before.wpm != self.config.wpm => {
                self.reading.change_rate(self.config.wpm, now);
            }
            SettingField::StripOptions if before.strip != self.config.strip => {
                self.retokenize();
            }
            _ => {}
        }

        if before != self.config {
            self.render();
        }
    }

    /// Ends the session: cancels playback and tells the sink to tear down.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.reading.stop();
        self.closed = true;
        info!("session closed");
        self.sink.session_closed();
    }

    fn apply_wpm(&mut self, wpm: u32, now: Instant) {
        if self.config.wpm == wpm {
            return;
        }
        self.config.wpm = wpm;
        self.reading.change_rate(wpm, now);
        self.persist(SettingsPatch::wpm(wpm));
        self.render();
    }

    fn retokenize(&mut self) {
        let words = tokenize_text(&self.text, self.config.strip);
        self.reading.replace_words(words);
    }

    fn persist(&mut self, patch: SettingsPatch) {
        if let Err(err) = self.store.save(&patch) {
            warn!(error = %err, "failed to persist settings");
        }
    }

    fn render(&mut self) {
        if self.closed {
            return;
        }
        let state = self.render_state();
        self.sink.render(&state);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.reading.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettingsStore;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorded {
        frames: Vec<RenderState>,
        closed: bool,
    }

    struct Recorder(Rc<RefCell<Recorded>>);

    impl RenderSink for Recorder {
        fn render(&mut self, state: &RenderState) {
            self.0.borrow_mut().frames.push(state.clone());
        }

        fn session_closed(&mut self) {
            self.0.borrow_mut().closed = true;
        }
    }

    fn session_with(store: MemorySettingsStore) -> (Session, Rc<RefCell<Recorded>>) {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let session = Session::new(Box::new(store), Box::new(Recorder(Rc::clone(&recorded))));
        (session, recorded)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn frame_count(recorded: &Rc<RefCell<Recorded>>) -> usize {
        recorded.borrow().frames.len()
    }

    fn last_frame(recorded: &Rc<RefCell<Recorded>>) -> RenderState {
        recorded.borrow().frames.last().cloned().expect("no frame rendered")
    }

    #[test]
    fn test_new_session_renders_stored_config() {
        let mut store = MemorySettingsStore::new();
        store.save(&SettingsPatch::wpm(450)).unwrap();
        let (session, recorded) = session_with(store);
        assert_eq!(session.config().wpm, 450);
        assert_eq!(session.reading().wpm(), 450);
        assert_eq!(frame_count(&recorded), 1);
    }

    #[test]
    fn test_set_text_tokenizes_and_renders_first_word() {
        let (mut session, recorded) = session_with(MemorySettingsStore::new());
        session.set_text("Hello, (world)!");
        let frame = last_frame(&recorded);
        assert_eq!(frame.word_count, 2);
        assert_eq!(frame.counter, "Word 1 of 2");
        assert_eq!(frame.segments.word(), "Hello,");
    }

    #[test]
    fn test_every_tick_renders() {
        let start = Instant::now();
        let (mut session, recorded) = session_with(MemorySettingsStore::new());
        session.set_text("one two three four five");
        let before = frame_count(&recorded);

        session.toggle_play(start);
        session.tick(start + ms(1000));

        let frames = recorded.borrow().frames[before..].to_vec();
        let indices: Vec<usize> = frames.iter().map(|f| f.current_index).collect();
        let playing: Vec<bool> = frames.iter().map(|f| f.is_playing).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 4]);
        assert_eq!(playing, vec![true, true, true, true, true, false]);
    }

    #[test]
    fn test_noop_controls_do_not_render() {
        let (mut session, recorded) = session_with(MemorySettingsStore::new());
        let before = frame_count(&recorded);
        session.toggle_play(Instant::now());
        session.seek(0.5);
        session.reset();
        assert_eq!(frame_count(&recorded), before);
        assert!(!session.reading().is_playing());
    }

    #[test]
    fn test_unchanged_settings_do_not_render() {
        let (mut session, recorded) = session_with(MemorySettingsStore::new());
        let before = frame_count(&recorded);
        assert!(session.set_text_size_level(3));
        session.set_theme(Theme::Dark);
        assert!(session.set_highlight_color("#f87171"));
        assert_eq!(frame_count(&recorded), before);

        session.set_theme(Theme::Light);
        assert_eq!(frame_count(&recorded), before + 1);
        assert_eq!(last_frame(&recorded).config.theme, Theme::Light);
    }

    #[test]
    fn test_invalid_rate_input_keeps_previous_value() {
        let (mut session, _) = session_with(MemorySettingsStore::new());
        let now = Instant::now();
        assert!(!session.set_wpm_input("fast", now));
        assert!(!session.set_wpm_input("50", now));
        assert!(!session.set_wpm(1200, now));
        assert_eq!(session.config().wpm, 300);

        assert!(session.set_wpm_input("450", now));
        assert_eq!(session.config().wpm, 450);
        assert_eq!(session.reading().wpm(), 450);
    }

    #[test]
    fn test_adjust_wpm_clamps() {
        let (mut session, _) = session_with(MemorySettingsStore::new());
        let now = Instant::now();
        for _ in 0..30 {
            session.adjust_wpm(50, now);
        }
        assert_eq!(session.config().wpm, 1000);
        for _ in 0..30 {
            session.adjust_wpm(-50, now);
        }
        assert_eq!(session.config().wpm, 100);
    }

    #[test]
    fn test_invalid_color_is_ignored() {
        let (mut session, _) = session_with(MemorySettingsStore::new());
        assert!(!session.set_highlight_color("#12345"));
        assert!(!session.set_highlight_color("purple"));
        assert_eq!(session.config().highlight_color.as_str(), "#f87171");
        assert!(session.set_highlight_color("#00FF00"));
        assert_eq!(session.config().highlight_color.as_str(), "#00FF00");
    }

    #[test]
    fn test_user_changes_are_persisted() {
        let store = MemorySettingsStore::new();
        let popup = store.surface();
        let (mut session, _) = session_with(store);
        let now = Instant::now();

        session.set_wpm(500, now);
        session.set_theme(Theme::Light);
        session.set_text_size_level(1);
        session.set_highlight_color("#0000ff");
        session.toggle_strip(StripClass::Quotes);

        let stored = popup.load();
        assert_eq!(stored.wpm, 500);
        assert_eq!(stored.theme, Theme::Light);
        assert_eq!(stored.text_size_level, 1);
        assert_eq!(stored.highlight_color.as_str(), "#0000ff");
        assert!(stored.strip.quotes);
    }

    #[test]
    fn test_text_size_level_bounds() {
        let (mut session, _) = session_with(MemorySettingsStore::new());
        assert!(!session.set_text_size_level(6));
        assert_eq!(session.config().text_size_level, 3);
        session.adjust_text_size(10);
        assert_eq!(session.config().text_size_level, 5);
        session.adjust_text_size(-10);
        assert_eq!(session.config().text_size_level, 0);
    }

    #[test]
    fn test_strip_toggle_retokenizes_and_rewinds() {
        let (mut session, _) = session_with(MemorySettingsStore::new());
        session.set_text("Hello, (world) again!");
        session.seek(0.9);
        assert_eq!(session.reading().current_index(), 2);

        session.toggle_strip(StripClass::Punctuation);
        session.toggle_strip(StripClass::Brackets);
        assert_eq!(session.reading().words(), ["Hello", "world", "again"]);
        assert_eq!(session.reading().current_index(), 0);
    }

    #[test]
    fn test_external_rate_change_restarts_timer_and_keeps_position() {
        let start = Instant::now();
        let store = MemorySettingsStore::new();
        let mut popup = store.surface();
        let (mut session, _) = session_with(store);
        session.set_text("a b c d e f g h i j");

        session.toggle_play(start);
        session.tick(start + ms(400));
        assert_eq!(session.reading().current_index(), 2);

        popup.save(&SettingsPatch::wpm(600)).unwrap();
        session.sync_external(start + ms(450));

        assert_eq!(session.config().wpm, 600);
        assert!(session.reading().is_playing());
        assert_eq!(session.reading().current_index(), 2);
        assert_eq!(session.next_deadline(), Some(start + ms(550)));

        session.tick(start + ms(650));
        assert_eq!(session.reading().current_index(), 4);
    }

    #[test]
    fn test_external_strip_change_retokenizes() {
        let store = MemorySettingsStore::new();
        let mut popup = store.surface();
        let (mut session, _) = session_with(store);
        session.set_text("\"quoted\" words here");
        session.seek(0.7);

        popup
            .save(&SettingsPatch::strip(StripOptions {
                quotes: true,
                ..StripOptions::default()
            }))
            .unwrap();
        session.sync_external(Instant::now());

        assert_eq!(session.reading().words()[0], "quoted");
        assert_eq!(session.reading().current_index(), 0);
    }

    #[test]
    fn test_external_theme_change_only_rerenders() {
        let start = Instant::now();
        let store = MemorySettingsStore::new();
        let mut popup = store.surface();
        let (mut session, recorded) = session_with(store);
        session.set_text("a b c d");
        session.toggle_play(start);
        session.tick(start + ms(200));
        let deadline = session.next_deadline();

        popup.save(&SettingsPatch::theme(Theme::Light)).unwrap();
        session.sync_external(start + ms(250));

        let frame = last_frame(&recorded);
        assert_eq!(frame.config.theme, Theme::Light);
        assert_eq!(frame.current_index, 1);
        assert!(frame.is_playing);
        assert_eq!(session.next_deadline(), deadline);
    }

    #[test]
    fn test_external_malformed_value_falls_back_to_default() {
        let mut record = crate::settings::SettingsRecord::new();
        record.insert("orpColor".into(), serde_json::json!("#abcdef"));
        let store = MemorySettingsStore::with_record(record);
        let (mut session, _) = session_with(store);
        assert_eq!(session.config().highlight_color.as_str(), "#abcdef");

        session.apply_external(
            SettingChange {
                field: SettingField::HighlightColor,
                value: serde_json::json!(12),
            },
            Instant::now(),
        );
        assert_eq!(session.config().highlight_color, HighlightColor::default());
    }

    #[test]
    fn test_close_cancels_timer_and_notifies_sink() {
        let start = Instant::now();
        let (mut session, recorded) = session_with(MemorySettingsStore::new());
        session.set_text("a b c");
        session.toggle_play(start);
        let before = frame_count(&recorded);

        session.close();
        assert!(recorded.borrow().closed);
        assert!(session.is_closed());
        assert!(!session.reading().is_playing());

        session.tick(start + ms(5000));
        session.toggle_play(start + ms(5000));
        assert_eq!(frame_count(&recorded), before);
    }
}
