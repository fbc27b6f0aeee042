use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use crate::config::{self, LoggingSettings};

/// Send `log` output to a file; the terminal belongs to the TUI.
///
/// `RUST_LOG` wins over `logging.level`. Returns the log file in use, or
/// `None` when logging could not be set up (the app still runs).
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    let path = settings.file.clone().or_else(config::default_log_path)?;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("pipod: cannot create log directory {}: {e}", parent.display());
            return None;
        }
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("pipod: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let mut builder = Builder::from_env(Env::default().default_filter_or(settings.level.as_str()));
    builder
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis();

    match builder.try_init() {
        Ok(()) => Some(path),
        Err(e) => {
            eprintln!("pipod: logger already set: {e}");
            None
        }
    }
}
