use super::{letter_spacing, spaced, start_column};
use crate::app::{App, AppMode, RenderState};
use crate::engine::config::{Config, TEXT_SIZES};
use crate::reading::StripClass;
use crate::ui::theme::Palette;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Regions of the last drawn frame that react to the mouse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameLayout {
    pub progress: Rect,
}

/// Draws the whole reader screen.
pub fn render_app(frame: &mut Frame, app: &App) -> FrameLayout {
    let state = app.get_render_state();
    let palette = Palette::from_config(&state.config);
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    if state.word_count == 0 {
        frame.render_widget(render_placeholder(&palette), chunks[0]);
    } else {
        render_word_display(frame, chunks[0], &state, &palette);
    }

    frame.render_widget(render_progress_bar(&state, chunks[1].width, &palette), chunks[1]);
    frame.render_widget(render_counter(&state, &palette), chunks[2]);
    render_command_deck(frame, chunks[3], app, &palette);

    if app.show_settings() {
        let panel = settings_area(chunks[0]);
        frame.render_widget(Clear, panel);
        frame.render_widget(render_settings_panel(&state.config, &palette), panel);
    }

    FrameLayout {
        progress: chunks[1],
    }
}

/// Draws the current word with its focus letter on the anchor column.
pub fn render_word_display(frame: &mut Frame, area: Rect, state: &RenderState, palette: &Palette) {
    if area.height == 0 || state.segments.is_empty() {
        return;
    }

    let spacing = letter_spacing(state.config.text_size_level);
    let gap = " ".repeat(spacing);
    let text_style = Style::default()
        .fg(palette.text)
        .add_modifier(Modifier::BOLD);
    let focus_style = Style::default()
        .fg(palette.anchor)
        .add_modifier(Modifier::BOLD);

    let segments = &state.segments;
    let mut spans = Vec::with_capacity(5);
    if !segments.prefix.is_empty() {
        spans.push(Span::styled(spaced(&segments.prefix, spacing), text_style));
        spans.push(Span::raw(gap.clone()));
    }
    spans.push(Span::styled(segments.focus.clone(), focus_style));
    if !segments.suffix.is_empty() {
        spans.push(Span::raw(gap));
        spans.push(Span::styled(spaced(&segments.suffix, spacing), text_style));
    }
    let line = Line::from(spans);

    let x = start_column(area, segments, spacing);
    let row = area.y + area.height / 2;
    let max_width = area.x + area.width - x;
    frame.buffer_mut().set_line(x, row, &line, max_width);
}

pub fn render_progress_bar(state: &RenderState, width: u16, palette: &Palette) -> Line<'static> {
    let width = usize::from(width);
    let filled = ((state.progress_fraction() * width as f64).round() as usize).min(width);

    Line::from(vec![
        Span::styled("━".repeat(filled), Style::default().fg(palette.anchor)),
        Span::styled("─".repeat(width - filled), Style::default().fg(palette.dimmed)),
    ])
}

pub fn render_counter(state: &RenderState, palette: &Palette) -> Line<'static> {
    let glyph = if state.is_playing { "▶" } else { "⏸" };
    Line::from(vec![
        Span::styled(format!("{glyph} "), Style::default().fg(palette.anchor)),
        Span::styled(state.counter.clone(), Style::default().fg(palette.text)),
        Span::styled(
            format!(" · {} wpm", state.config.wpm),
            Style::default().fg(palette.dimmed),
        ),
    ])
    .alignment(Alignment::Center)
}

pub fn render_settings_panel(config: &Config, palette: &Palette) -> Paragraph<'static> {
    let label = Style::default().fg(palette.dimmed);
    let value = Style::default().fg(palette.text);
    let row = |name: &str, shown: String| {
        Line::from(vec![
            Span::styled(format!("{name:<8}"), label),
            Span::styled(shown, value),
        ])
    };

    let mut lines = vec![
        row("speed", format!("{} wpm  (+/-)", config.wpm)),
        row(
            "size",
            format!(
                "{} ({}px)  ([ ])",
                config.text_size_level,
                TEXT_SIZES[config.text_size_level]
            ),
        ),
        row("theme", format!("{}  (t)", config.theme)),
        Line::from(vec![
            Span::styled(format!("{:<8}", "color"), label),
            Span::styled("■ ", Style::default().fg(palette.anchor)),
            Span::styled(config.highlight_color.to_string(), value),
        ]),
    ];
    for (class, key) in [
        (StripClass::Punctuation, 'p'),
        (StripClass::Brackets, 'b'),
        (StripClass::Quotes, 'u'),
    ] {
        let mark = if config.strip.is_enabled(class) { "x" } else { " " };
        lines.push(row("strip", format!("[{mark}] {}  ({key})", class.name())));
    }

    Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Settings ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.dimmed)),
        )
        .style(Style::default().bg(palette.surface))
}

fn settings_area(area: Rect) -> Rect {
    let width = area.width.min(40);
    let height = area.height.min(9);
    Rect::new(area.x + area.width - width, area.y, width, height)
}

pub fn render_command_deck(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    frame.render_widget(Clear, area);

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let accent = Paragraph::new("▌").style(Style::default().fg(palette.anchor).bg(palette.surface));
    frame.render_widget(accent, layout[0]);

    let (text, style) = match app.mode() {
        AppMode::Command => (
            format!(" :{}", app.command_input()),
            Style::default().fg(palette.text),
        ),
        _ => match app.status() {
            Some(status) => (format!(" {status}"), Style::default().fg(palette.text)),
            None => (
                " : command · s settings · ? help".to_string(),
                Style::default().fg(palette.dimmed),
            ),
        },
    };

    frame.render_widget(Paragraph::new(text).style(style.bg(palette.surface)), layout[1]);
}

pub fn render_placeholder(palette: &Palette) -> Paragraph<'static> {
    let text = "\n\nNothing to read\nType :@filename to load a file\nOr :@@ to load from clipboard";
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.dimmed).bg(palette.background))
}
