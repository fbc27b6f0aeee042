//! UI rendering for the terminal user interface.
//!
//! Every screen is a list or a centered panel drawn with `ratatui`; a slide
//! transition shifts the body horizontally while it runs.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, MenuAction, Screen, SettingsItem, SlideDirection, SyncStatus, Transition};
use crate::error::SyncError;
use crate::library::{format_time, progress_ratio, remaining};

/// Number of segments in the volume bar.
const VOLUME_BARS: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Theme {
    pub fg: Color,
    pub bg: Color,
    pub secondary: Color,
    pub highlight: Color,
    pub progress: Color,
    pub inactive: Color,
}

impl Theme {
    pub(crate) fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                fg: Color::Rgb(230, 230, 230),
                bg: Color::Rgb(24, 24, 28),
                secondary: Color::Rgb(150, 150, 160),
                highlight: Color::Rgb(70, 110, 200),
                progress: Color::Rgb(90, 160, 255),
                inactive: Color::Rgb(70, 70, 80),
            }
        } else {
            Self {
                fg: Color::Rgb(30, 30, 30),
                bg: Color::Rgb(250, 250, 250),
                secondary: Color::Rgb(110, 110, 110),
                highlight: Color::Rgb(0, 122, 255),
                progress: Color::Rgb(0, 122, 255),
                inactive: Color::Rgb(200, 200, 200),
            }
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    fn selected(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, app: &App, now: Instant) {
    let theme = Theme::for_mode(app.dark_mode);
    let area = frame.area();
    frame.render_widget(Block::default().style(theme.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    let header = Paragraph::new(screen_title(app))
        .alignment(Alignment::Center)
        .style(theme.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" pipod ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let body = slide_rect(chunks[1], app.transition.as_ref());
    frame.render_widget(Clear, chunks[1]);
    frame.render_widget(Block::default().style(theme.base()), chunks[1]);
    if body.width > 0 {
        match app.screen() {
            Screen::MainMenu => {
                let items: Vec<String> = MenuAction::ALL.iter().map(|a| a.label().to_string()).collect();
                draw_list(frame, body, &items, None, app.menu_selected, &theme);
            }
            Screen::Browse => {
                let items = app.browse.labels();
                let selected = if app.browse.is_empty() { usize::MAX } else { app.browse.selected };
                draw_list(frame, body, &items, None, selected, &theme);
            }
            Screen::Settings => {
                let items: Vec<String> = SettingsItem::ALL.iter().map(|i| i.label().to_string()).collect();
                let states: Vec<String> = SettingsItem::ALL
                    .iter()
                    .map(|i| (if app.setting_enabled(*i) { "On" } else { "Off" }).to_string())
                    .collect();
                draw_list(frame, body, &items, Some(states.as_slice()), app.settings_selected, &theme);
            }
            Screen::NowPlaying => draw_now_playing(frame, body, app, now, &theme),
            Screen::Sync => draw_sync(frame, body, app, &theme),
        }
    }

    let footer_text = match &app.status {
        Some(err) => format!("error: {err}"),
        None => controls_text(app.screen(), app.sync.is_running()).to_string(),
    };
    let footer_style = if app.status.is_some() {
        theme.base().fg(Color::Red)
    } else {
        theme.base().fg(theme.secondary)
    };
    let footer = Paragraph::new(footer_text)
        .style(footer_style)
        .block(Block::default().borders(Borders::ALL).padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        }))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);
}

fn screen_title(app: &App) -> String {
    match app.screen() {
        Screen::MainMenu => "Main Menu".to_string(),
        Screen::Browse => app.browse.title(),
        Screen::NowPlaying => "Now Playing".to_string(),
        Screen::Settings => "Settings".to_string(),
        Screen::Sync => "Sync USB".to_string(),
    }
}

fn controls_text(screen: Screen, syncing: bool) -> &'static str {
    match screen {
        Screen::NowPlaying => {
            "[up/down] volume | [right] play/pause | [i/o] prev/next | [left] back | [q] quit"
        }
        Screen::Sync if syncing => "[left] back and cancel sync | [q] quit",
        Screen::Sync => "[left] back | [q] quit",
        Screen::MainMenu => "[up/down] move | [enter] select | [i/o] prev/next | [q] quit",
        _ => "[up/down] move | [enter] select | [left] back | [i/o] prev/next | [q] quit",
    }
}

/// Body area while a slide runs: forward slides enter from the right,
/// back slides from the left.
pub(crate) fn slide_rect(area: Rect, transition: Option<&Transition>) -> Rect {
    let Some(t) = transition else {
        return area;
    };
    let offset = ((f32::from(area.width) * t.remaining()).round() as u16).min(area.width);
    match t.direction {
        SlideDirection::Forward => Rect {
            x: area.x + offset,
            width: area.width - offset,
            ..area
        },
        SlideDirection::Back => Rect {
            width: area.width - offset,
            ..area
        },
    }
}

/// Rows `[start, end)` to show so `selected` stays near the middle, and the
/// selected row's position within them.
pub(crate) fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    let selected = selected.min(total.saturating_sub(1));
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Filled segments of a volume bar of `VOLUME_BARS` segments.
pub(crate) fn volume_segments(volume: f32) -> usize {
    ((volume.clamp(0.0, 1.0) * VOLUME_BARS as f32).round() as usize).min(VOLUME_BARS)
}

/// A menu list; `selected == usize::MAX` draws no highlight.
fn draw_list(
    frame: &mut Frame,
    area: Rect,
    items: &[String],
    right: Option<&[String]>,
    selected: usize,
    theme: &Theme,
) {
    let block = Block::default().borders(Borders::ALL).style(theme.base());
    let inner_height = block.inner(area).height as usize;
    let inner_width = block.inner(area).width as usize;
    let highlight = selected != usize::MAX && !items.is_empty();
    let (start, end, pos) = visible_window(items.len(), inner_height, if highlight { selected } else { 0 });

    let rows: Vec<ListItem> = items[start..end]
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let Some(state) = right.and_then(|r| r.get(start + i)) else {
                return ListItem::new(format!(" {label}"));
            };
            let used = label.chars().count() + state.chars().count() + 3;
            let pad = inner_width.saturating_sub(used);
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {label}{} ", " ".repeat(pad))),
                Span::styled(state.clone(), Style::default().fg(theme.secondary)),
            ]))
        })
        .collect();

    let list = List::new(rows).block(block).highlight_style(theme.selected());
    let mut state = ListState::default();
    if highlight {
        state.select(Some(pos));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_now_playing(frame: &mut Frame, area: Rect, app: &App, now: Instant, theme: &Theme) {
    let block = Block::default().borders(Borders::ALL).style(theme.base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(np) = app.now_playing() else {
        let empty = Paragraph::new("No track playing")
            .alignment(Alignment::Center)
            .style(theme.base().fg(theme.secondary));
        frame.render_widget(empty, centered_rows(inner, 1));
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    if !np.playing {
        let paused = Paragraph::new(" ▌▌").style(theme.base().add_modifier(Modifier::BOLD));
        frame.render_widget(paused, rows[0]);
    }

    let title = Paragraph::new(np.title.as_str())
        .alignment(Alignment::Center)
        .style(theme.base().add_modifier(Modifier::BOLD));
    frame.render_widget(title, rows[2]);
    let artist = Paragraph::new(np.artist.as_str())
        .alignment(Alignment::Center)
        .style(theme.base().fg(theme.secondary));
    frame.render_widget(artist, rows[3]);

    if !np.duration.is_zero() {
        let gauge = Gauge::default()
            .ratio(progress_ratio(np.elapsed, np.duration))
            .label("")
            .gauge_style(Style::default().fg(theme.progress).bg(theme.inactive));
        frame.render_widget(gauge, pad_horizontal(rows[5], 2));

        let times = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(pad_horizontal(rows[6], 2));
        let elapsed = Paragraph::new(format_time(np.elapsed)).style(theme.base().fg(theme.secondary));
        let left = Paragraph::new(format!("-{}", format_time(remaining(np.elapsed, np.duration))))
            .alignment(Alignment::Right)
            .style(theme.base().fg(theme.secondary));
        frame.render_widget(elapsed, times[0]);
        frame.render_widget(left, times[1]);
    }

    if app.volume_visible(now) {
        let filled = volume_segments(app.player.volume());
        let line = Line::from(vec![
            Span::styled("■ ".repeat(filled), Style::default().fg(theme.progress)),
            Span::styled("■ ".repeat(VOLUME_BARS - filled), Style::default().fg(theme.inactive)),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), rows[8]);
    }
}

fn draw_sync(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let block = Block::default().borders(Borders::ALL).style(theme.base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let headline = match app.sync.status() {
        SyncStatus::Done(Err(SyncError::VolumeNotFound(_) | SyncError::Cancelled)) => theme.fg,
        SyncStatus::Done(Err(_)) => Color::Red,
        _ => theme.fg,
    };
    let mut lines = vec![Line::from(Span::styled(
        app.sync.message(),
        Style::default().fg(headline).add_modifier(Modifier::BOLD),
    ))];
    if let Some(detail) = app.sync.detail() {
        lines.push(Line::from(Span::styled(detail, Style::default().fg(theme.secondary))));
    }
    if app.sync.attempted() && !app.sync.is_running() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press LEFT to go back",
            Style::default().fg(theme.inactive),
        )));
    }
    let height = lines.len() as u16;
    let text = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(theme.base())
        .wrap(Wrap { trim: true });
    frame.render_widget(text, centered_rows(inner, height));
}

fn centered_rows(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}

fn pad_horizontal(area: Rect, pad: u16) -> Rect {
    let pad = pad.min(area.width / 2);
    Rect {
        x: area.x + pad,
        width: area.width - 2 * pad,
        ..area
    }
}
