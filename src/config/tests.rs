use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use super::state::PersistedToggles;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_pipod_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("PIPOD_CONFIG_PATH", "/tmp/pipod-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/pipod-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/xdg-config-home")
            .join("pipod")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("pipod")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");

    assert_eq!(
        default_log_path().unwrap(),
        PathBuf::from("/tmp/xdg-state").join("pipod").join("pipod.log")
    );
}

#[test]
fn library_root_prefers_cli_then_config() {
    let mut s = Settings::default();
    s.library.root = Some(PathBuf::from("/srv/music"));

    assert_eq!(
        s.library_root(Some(Path::new("/cli/music"))),
        PathBuf::from("/cli/music")
    );
    assert_eq!(s.library_root(None), PathBuf::from("/srv/music"));
}

#[test]
fn defaults_match_device_behavior() {
    let s = Settings::default();
    assert!(!s.playback.repeat_playlist);
    assert_eq!(s.playback.restart_threshold_secs, 30);
    assert_eq!(s.sync.volume_label, "PIPOD");
    assert_eq!(s.sync.drive_music_dir, "music");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.ui.frame_rate_hz = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.sync.volume_label = "  ".into();
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
root = "/data/music"
extensions = ["mp3", "MP3"]

[playback]
repeat_playlist = true
restart_threshold_secs = 10

[sync]
volume_label = "MYPOD"
on_startup = false

[ui]
dark_mode = true
frame_rate_hz = 30

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("PIPOD_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("PIPOD__UI__FRAME_RATE_HZ");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.root, Some(PathBuf::from("/data/music")));
    assert_eq!(s.library.extensions.len(), 2);
    assert!(s.playback.repeat_playlist);
    assert_eq!(s.playback.restart_threshold_secs, 10);
    assert_eq!(s.sync.volume_label, "MYPOD");
    assert!(!s.sync.on_startup);
    assert_eq!(s.sync.drive_music_dir, "music");
    assert!(s.ui.dark_mode);
    assert_eq!(s.ui.frame_rate_hz, 30);
    assert_eq!(s.logging.level, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[ui]
frame_rate_hz = 60
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("PIPOD_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("PIPOD__UI__FRAME_RATE_HZ", "24");

    let s = Settings::load().unwrap();
    assert_eq!(s.ui.frame_rate_hz, 24);
}

#[test]
fn persisted_toggles_survive_a_save_and_apply_to_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.toml");

    assert_eq!(PersistedToggles::load_from(&path).unwrap(), None);

    let toggles = PersistedToggles {
        repeat_playlist: true,
        dark_mode: false,
    };
    toggles.save_to(&path).unwrap();

    let loaded = PersistedToggles::load_from(&path).unwrap().unwrap();
    let mut s = Settings::default();
    s.ui.dark_mode = true;
    loaded.apply(&mut s);
    assert!(s.playback.repeat_playlist);
    assert!(!s.ui.dark_mode);
}
