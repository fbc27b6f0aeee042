use std::env;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{PlaybackController, RodioOutput};
use crate::config;
use crate::library;

mod event_loop;
mod logging;
mod settings;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, warnings) = settings::load_settings();

    let log_file = logging::init(&settings.logging);
    log::info!("pipod {} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &log_file {
        log::debug!("logging to {}", path.display());
    }
    for w in &warnings {
        log::warn!("{w}");
    }

    let cli_root = env::args_os().nth(1).map(PathBuf::from);
    let root = settings.library_root(cli_root.as_deref());
    log::info!("library root: {}", root.display());

    if let Err(e) = library::ensure_layout(&root) {
        log::warn!("could not create library folders under {}: {e}", root.display());
    }

    let output = RodioOutput::open(settings.playback.initial_volume).inspect_err(|e| {
        log::error!("{e}");
    })?;
    let player = PlaybackController::new(Box::new(output), settings.library.clone(), &settings.playback);

    let mut app = App::new(player, &settings, root);
    if let Some(path) = config::state_path() {
        app.persist_toggles_to(path);
    }
    if settings.sync.on_startup {
        log::info!("starting background sync");
        app.sync.start();
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        log::error!("event loop failed: {e}");
    }
    run_result
}
