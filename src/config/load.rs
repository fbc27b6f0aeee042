use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `PIPOD__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("PIPOD")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.ui.frame_rate_hz == 0 {
            return Err("ui.frame_rate_hz must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.playback.initial_volume) {
            return Err("playback.initial_volume must be within 0.0..=1.0".to_string());
        }
        if !(self.controls.volume_step > 0.0 && self.controls.volume_step <= 1.0) {
            return Err("controls.volume_step must be within (0.0, 1.0]".to_string());
        }
        if self.sync.volume_label.trim().is_empty() {
            return Err("sync.volume_label must not be empty".to_string());
        }
        if self.sync.drive_music_dir.trim().is_empty() {
            return Err("sync.drive_music_dir must not be empty".to_string());
        }
        if self.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("library.extensions must name at least one extension".to_string());
        }
        Ok(())
    }

    /// Pick the library root: explicit CLI argument, then `library.root`,
    /// then the platform default.
    pub fn library_root(&self, cli_arg: Option<&Path>) -> PathBuf {
        cli_arg
            .map(Path::to_path_buf)
            .or_else(|| self.library.root.clone())
            .unwrap_or_else(default_library_root)
    }
}

/// Resolve the config path from `PIPOD_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("PIPOD_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/pipod/config.toml`
/// or `~/.config/pipod/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        home_dir().map(|home| home.join(".config"))
    };

    config_home.map(|d| d.join("pipod").join("config.toml"))
}

/// `$XDG_STATE_HOME/pipod/pipod.log`, falling back to `~/.local/state`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        home_dir().map(|home| home.join(".local").join("state"))
    };

    state_home.map(|d| d.join("pipod").join("pipod.log"))
}

/// `~/Music/music` when `~/Music` exists, `~/music` otherwise. Falls back
/// to `./music` without a home directory.
pub fn default_library_root() -> PathBuf {
    match home_dir() {
        Some(home) => {
            let music = home.join("Music");
            if music.is_dir() {
                music.join("music")
            } else {
                home.join("music")
            }
        }
        None => PathBuf::from("music"),
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
