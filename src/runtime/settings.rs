use crate::config::{self, PersistedToggles};

/// Load config, falling back to defaults, then re-apply the toggles saved
/// from the settings screen.
///
/// Runs before the logger exists (the log file is configured here), so
/// problems are returned for the caller to log once it is up.
pub fn load_settings() -> (config::Settings, Vec<String>) {
    let mut warnings = Vec::new();
    let mut settings = match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warnings.push(format!("invalid config, using defaults: {msg}"));
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            warnings.push(format!("failed to load config, using defaults: {e}"));
            config::Settings::default()
        }
    };

    if let Some(path) = config::state_path() {
        match PersistedToggles::load_from(&path) {
            Ok(Some(toggles)) => toggles.apply(&mut settings),
            Ok(None) => {}
            Err(e) => warnings.push(format!("ignoring unreadable {}: {e}", path.display())),
        }
    }

    (settings, warnings)
}
