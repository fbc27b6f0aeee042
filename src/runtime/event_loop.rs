use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Input};
use crate::config;
use crate::ui;

/// Main terminal loop, one iteration per frame: advance state, draw, then
/// wait for input for whatever is left of the frame. Returns `Ok(())` when
/// the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame = frame_duration(settings.ui.frame_rate_hz);

    loop {
        let started = Instant::now();
        app.tick(started);
        terminal.draw(|f| ui::draw(f, app, started))?;

        let budget = frame.saturating_sub(started.elapsed());
        if event::poll(budget)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(input) = map_key(key) {
                    app.handle(input, Instant::now());
                }
            }
        }

        if app.should_quit {
            log::info!("quit requested");
            return Ok(());
        }
    }
}

pub(crate) fn frame_duration(frame_rate_hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(frame_rate_hz.max(1)))
}

/// Translate a terminal key press into an app input.
pub(crate) fn map_key(key: KeyEvent) -> Option<Input> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Input::Quit);
    }
    let input = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Input::Up,
        KeyCode::Down | KeyCode::Char('j') => Input::Down,
        KeyCode::Enter => Input::Enter,
        KeyCode::Left | KeyCode::Backspace | KeyCode::Esc => Input::Back,
        KeyCode::Right => Input::Right,
        KeyCode::Char('i') => Input::Previous,
        KeyCode::Char('o') => Input::Next,
        KeyCode::Char('q') => Input::Quit,
        _ => return None,
    };
    Some(input)
}
