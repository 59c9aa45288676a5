use super::event::{AppEvent, Key};
use super::mode::AppMode;
use super::render_state::{RenderSink, RenderState};
use super::session::Session;
use crate::engine::config::{parse_text_size_level, Theme, WPM_STEP};
use crate::input::{self, LoadError, LoadedText};
use crate::settings::SettingsStore;
use crate::ui::command::{command_to_app_event, parse_command};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;
use tracing::{info, warn};

pub const HELP_TEXT: &str = "space play/pause · r reset · 0-9 seek · +/- speed · [ ] size · t theme · s settings · p/b/u strip · : command · q quit";

/// Latest payload pushed by the session, read back when drawing.
#[derive(Default)]
struct FrameSlot {
    latest: Option<RenderState>,
    closed: bool,
}

struct SlotSink(Rc<RefCell<FrameSlot>>);

impl RenderSink for SlotSink {
    fn render(&mut self, state: &RenderState) {
        self.0.borrow_mut().latest = Some(state.clone());
    }

    fn session_closed(&mut self) {
        self.0.borrow_mut().closed = true;
    }
}

/// Terminal host around one reading session: input modes, command deck, status line.
pub struct App {
    mode: AppMode,
    session: Session,
    frame: Rc<RefCell<FrameSlot>>,
    command_input: String,
    status: Option<String>,
    show_settings: bool,
}

impl App {
    pub fn new(store: Box<dyn SettingsStore>) -> Self {
        let frame = Rc::new(RefCell::new(FrameSlot::default()));
        let session = Session::new(store, Box::new(SlotSink(Rc::clone(&frame))));
        Self {
            mode: AppMode::Reading,
            session,
            frame,
            command_input: String::new(),
            status: None,
            show_settings: false,
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn command_input(&self) -> &str {
        &self.command_input
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn show_settings(&self) -> bool {
        self.show_settings
    }

    pub fn is_closed(&self) -> bool {
        self.frame.borrow().closed
    }

    pub fn get_render_state(&self) -> RenderState {
        self.frame
            .borrow()
            .latest
            .clone()
            .unwrap_or_else(|| self.session.render_state())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.next_deadline()
    }

    pub fn tick(&mut self, now: Instant) {
        self.session.tick(now);
    }

    pub fn sync_settings(&mut self, now: Instant) {
        self.session.sync_external(now);
    }

    pub fn load_text(&mut self, loaded: LoadedText) {
        info!(source = %loaded.source, "loading text");
        self.status = Some(format!("Loaded {}", loaded.source));
        self.session.set_text(loaded.text);
    }

    pub fn handle_keypress(&mut self, key: Key, now: Instant) {
        match self.mode {
            AppMode::Reading => {
                let event = reading_key_event(key);
                self.handle_event(event, now);
            }
            AppMode::Command => self.handle_command_key(key, now),
            AppMode::Quit => {}
        }
    }

    fn handle_command_key(&mut self, key: Key, now: Instant) {
        match key {
            Key::Char(c) => self.command_input.push(c),
            Key::Backspace => {
                if self.command_input.pop().is_none() {
                    self.mode = AppMode::Reading;
                }
            }
            Key::Esc => {
                self.command_input.clear();
                self.mode = AppMode::Reading;
            }
            Key::Enter => {
                let input = std::mem::take(&mut self.command_input);
                self.mode = AppMode::Reading;
                let event = command_to_app_event(parse_command(&input));
                self.handle_event(event, now);
            }
            Key::Up | Key::Down | Key::Other => {}
        }
    }

    pub fn handle_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::TogglePlay => self.session.toggle_play(now),
            AppEvent::Reset => self.session.reset(),
            AppEvent::Seek(fraction) => self.session.seek(fraction),
            AppEvent::AdjustWpm(delta) => self.session.adjust_wpm(delta, now),
            AppEvent::SetWpm(input) => {
                if !self.session.set_wpm_input(&input, now) {
                    self.warn(format!("Ignored speed '{input}' (expected 100-1000)"));
                }
            }
            AppEvent::AdjustTextSize(delta) => self.session.adjust_text_size(delta),
            AppEvent::SetTextSize(input) => match parse_text_size_level(&input) {
                Some(level) => {
                    self.session.set_text_size_level(level);
                }
                None => self.warn(format!("Ignored text size '{input}' (expected 0-5)")),
            },
            AppEvent::ToggleTheme => {
                let theme = self.session.config().theme.toggled();
                self.session.set_theme(theme);
            }
            AppEvent::SetTheme(input) => match input.parse::<Theme>() {
                Ok(theme) => self.session.set_theme(theme),
                Err(err) => self.warn(err),
            },
            AppEvent::SetColor(input) => {
                if !self.session.set_highlight_color(&input) {
                    self.warn(format!("Ignored color '{input}' (expected #RRGGBB)"));
                }
            }
            AppEvent::ToggleStrip(class) => self.session.toggle_strip(class),
            AppEvent::ToggleSettings => self.show_settings = !self.show_settings,
            AppEvent::EnterCommand => {
                self.command_input.clear();
                self.mode = AppMode::Command;
            }
            AppEvent::LoadFile(path) => {
                let result = input::load_file(Path::new(&path));
                self.finish_load(result);
            }
            AppEvent::LoadClipboard => {
                let result = input::clipboard::load();
                self.finish_load(result);
            }
            AppEvent::Help => self.status = Some(HELP_TEXT.to_string()),
            AppEvent::Warning(message) => self.warn(message),
            AppEvent::InvalidCommand(input) => self.warn(format!("Unknown command: {input}")),
            AppEvent::Quit => {
                self.session.close();
                self.mode = AppMode::Quit;
            }
            AppEvent::None => {}
        }
    }

    fn finish_load(&mut self, result: Result<LoadedText, LoadError>) {
        match result {
            Ok(loaded) => self.load_text(loaded),
            Err(err) => self.warn(err.to_string()),
        }
    }

    fn warn(&mut self, message: String) {
        warn!(%message, "input rejected");
        self.status = Some(message);
    }
}

/// Key bindings while reading.
pub fn reading_key_event(key: Key) -> AppEvent {
    let step = WPM_STEP as i32;
    match key {
        Key::Char(' ') => AppEvent::TogglePlay,
        Key::Char('r') => AppEvent::Reset,
        Key::Char(c @ '0'..='9') => AppEvent::Seek(f64::from(c as u8 - b'0') / 10.0),
        Key::Char('+') | Key::Char('=') | Key::Up => AppEvent::AdjustWpm(step),
        Key::Char('-') | Key::Down => AppEvent::AdjustWpm(-step),
        Key::Char(']') => AppEvent::AdjustTextSize(1),
        Key::Char('[') => AppEvent::AdjustTextSize(-1),
        Key::Char('t') => AppEvent::ToggleTheme,
        Key::Char('s') => AppEvent::ToggleSettings,
        Key::Char('p') => AppEvent::ToggleStrip(crate::reading::StripClass::Punctuation),
        Key::Char('b') => AppEvent::ToggleStrip(crate::reading::StripClass::Brackets),
        Key::Char('u') => AppEvent::ToggleStrip(crate::reading::StripClass::Quotes),
        Key::Char(':') => AppEvent::EnterCommand,
        Key::Char('?') | Key::Char('h') => AppEvent::Help,
        Key::Char('q') | Key::Esc => AppEvent::Quit,
        _ => AppEvent::None,
    }
}
