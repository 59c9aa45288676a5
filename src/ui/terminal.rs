use crate::app::{App, AppEvent, AppMode, Key};
use crate::ui::reader::view::{render_app, FrameLayout};
use crate::ui::terminal_guard::TerminalGuard;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tracing::debug;

/// Longest wait for input when nothing is due.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// How often the settings store is checked for changes made elsewhere.
const SETTINGS_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct TuiManager {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    layout: FrameLayout,
    _guard: TerminalGuard,
}

impl TuiManager {
    pub fn new() -> Result<Self, io::Error> {
        let guard = TerminalGuard::new()?;
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(TuiManager {
            terminal,
            layout: FrameLayout::default(),
            _guard: guard,
        })
    }

    /// Runs until the app quits. Word advancement is driven by the session's deadline.
    pub fn run_event_loop(&mut self, app: &mut App) -> io::Result<()> {
        let mut last_sync = Instant::now();

        loop {
            self.render_frame(app)?;
            if app.mode() == AppMode::Quit || app.is_closed() {
                return Ok(());
            }

            let timeout = poll_timeout(app.next_deadline(), Instant::now());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(app, key);
                    }
                    Event::Mouse(mouse) => self.handle_mouse(app, mouse),
                    _ => {}
                }
            }

            let now = Instant::now();
            app.tick(now);
            if now.duration_since(last_sync) >= SETTINGS_POLL_INTERVAL {
                app.sync_settings(now);
                last_sync = now;
            }
        }
    }

    fn handle_key(&mut self, app: &mut App, key: KeyEvent) {
        let now = Instant::now();
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            app.handle_event(AppEvent::Quit, now);
            return;
        }
        app.handle_keypress(map_key(key.code), now);
    }

    fn handle_mouse(&mut self, app: &mut App, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if let Some(fraction) = click_fraction(self.layout.progress, mouse.column, mouse.row) {
            debug!(fraction, "progress bar click");
            app.handle_event(AppEvent::Seek(fraction), Instant::now());
        }
    }

    pub fn render_frame(&mut self, app: &App) -> io::Result<()> {
        let mut layout = self.layout;
        self.terminal.draw(|frame| layout = render_app(frame, app))?;
        self.layout = layout;
        Ok(())
    }
}

pub fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        _ => Key::Other,
    }
}

/// Time to wait for input: until the next word is due, never longer than `IDLE_POLL`.
pub fn poll_timeout(deadline: Option<Instant>, now: Instant) -> Duration {
    match deadline {
        Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_POLL),
        None => IDLE_POLL,
    }
}

/// Fraction of the bar left of a click, if the click hit the bar.
pub fn click_fraction(bar: Rect, column: u16, row: u16) -> Option<f64> {
    if bar.width == 0 || row < bar.y || row >= bar.y + bar.height {
        return None;
    }
    if column < bar.x || column >= bar.x + bar.width {
        return None;
    }
    Some(f64::from(column - bar.x) / f64::from(bar.width))
}
