use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/pipod/config.toml` or `~/.config/pipod/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `PIPOD__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub sync: SyncSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Library root. The first CLI argument wins over this; when both are
    /// absent `~/Music/music` (or `~/music`) is used.
    pub root: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when walking the whole library.
    pub follow_links: bool,
    /// Whether to list hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            extensions: vec!["mp3".into()],
            follow_links: true,
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Wrap to the first track when the last one in the context ends.
    pub repeat_playlist: bool,
    /// Past this position "previous" restarts the current track instead.
    pub restart_threshold_secs: u64,
    /// Output volume at startup, 0.0..=1.0.
    pub initial_volume: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            repeat_playlist: false,
            restart_threshold_secs: 30,
            initial_volume: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Volume change per Up/Down press on the now-playing screen.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { volume_step: 0.1 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Label of the removable drive to pair with.
    pub volume_label: String,
    /// Top-level folder on the drive that mirrors the library.
    pub drive_music_dir: String,
    /// Directories searched (one and two levels deep) for the drive on Linux,
    /// after the kernel mount table.
    pub media_roots: Vec<PathBuf>,
    /// Run one sync in the background right after startup.
    pub on_startup: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            volume_label: "PIPOD".to_string(),
            drive_music_dir: "music".to_string(),
            media_roots: vec!["/media".into(), "/mnt".into(), "/run/media".into()],
            on_startup: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub dark_mode: bool,
    /// Frames per second of the main loop.
    pub frame_rate_hz: u32,
    /// Length of a slide transition in frames. 0 disables slides.
    pub transition_frames: u16,
    /// How long the volume bar stays visible after a change.
    pub volume_overlay_secs: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            frame_rate_hz: 60,
            transition_frames: 12,
            volume_overlay_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `env_logger` filter used when `RUST_LOG` is not set.
    pub level: String,
    /// Log file; defaults to `$XDG_STATE_HOME/pipod/pipod.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
