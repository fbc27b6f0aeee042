//! Toggles flipped from the settings screen, persisted across restarts.
//!
//! They live in `state.toml` next to `config.toml` so the user's hand-written
//! config is never rewritten.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::load::resolve_config_path;
use super::schema::Settings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedToggles {
    pub repeat_playlist: bool,
    pub dark_mode: bool,
}

impl PersistedToggles {
    /// Read toggles from `path`. A missing file yields `None`.
    pub fn load_from(path: &Path) -> io::Result<Option<Self>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        toml::from_str(&text)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text =
            toml::to_string(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, text)
    }

    pub fn apply(&self, settings: &mut Settings) {
        settings.playback.repeat_playlist = self.repeat_playlist;
        settings.ui.dark_mode = self.dark_mode;
    }
}

/// `state.toml` in the same directory as the resolved config file.
pub fn state_path() -> Option<PathBuf> {
    resolve_config_path().map(|p| p.with_file_name("state.toml"))
}
