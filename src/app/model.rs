//! The application model: screen stack, browse and sync state, the playback
//! controller and the UI toggles, plus the key dispatch that drives them.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::audio::{NowPlaying, PlaybackController};
use crate::config::{LibrarySettings, PersistedToggles, Settings};

use super::browse::{Activation, BrowseState};
use super::navigation::{MenuAction, Navigator, Screen, SettingsItem, SlideDirection, Transition, step};
use super::sync_state::SyncState;

/// Keys the player reacts to, independent of the terminal backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Enter,
    Back,
    /// Pause/resume on the now-playing screen.
    Right,
    /// Previous track or restart, on any screen.
    Previous,
    /// Next track, on any screen.
    Next,
    Quit,
}

pub struct App {
    pub nav: Navigator,
    pub menu_selected: usize,
    pub settings_selected: usize,
    pub browse: BrowseState,
    pub player: PlaybackController,
    pub sync: SyncState,
    pub dark_mode: bool,
    pub transition: Option<Transition>,
    /// Last playback error, cleared by the next transport key that works.
    pub status: Option<String>,
    pub should_quit: bool,

    library: LibrarySettings,
    volume_step: f32,
    volume_shown_at: Option<Instant>,
    volume_overlay: Duration,
    transition_frames: u16,
    state_path: Option<PathBuf>,
}

impl App {
    pub fn new(player: PlaybackController, settings: &Settings, root: PathBuf) -> Self {
        let mut browse = BrowseState::new(root.clone());
        browse.open_root(&settings.library);

        Self {
            nav: Navigator::new(),
            menu_selected: 0,
            settings_selected: 0,
            browse,
            player,
            sync: SyncState::new(settings.sync.clone(), settings.library.clone(), root),
            dark_mode: settings.ui.dark_mode,
            transition: None,
            status: None,
            should_quit: false,
            library: settings.library.clone(),
            volume_step: settings.controls.volume_step,
            volume_shown_at: None,
            volume_overlay: Duration::from_secs(settings.ui.volume_overlay_secs),
            transition_frames: settings.ui.transition_frames,
            state_path: None,
        }
    }

    /// Where settings toggles are saved when flipped.
    pub fn persist_toggles_to(&mut self, path: PathBuf) {
        self.state_path = Some(path);
    }

    pub fn screen(&self) -> Screen {
        self.nav.current()
    }

    pub fn now_playing(&self) -> Option<NowPlaying> {
        self.player.now_playing()
    }

    pub fn volume_visible(&self, now: Instant) -> bool {
        self.volume_shown_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.volume_overlay)
    }

    pub fn setting_enabled(&self, item: SettingsItem) -> bool {
        match item {
            SettingsItem::RepeatPlaylist => self.player.repeat_playlist(),
            SettingsItem::DarkMode => self.dark_mode,
        }
    }

    pub fn handle(&mut self, input: Input, now: Instant) {
        match input {
            Input::Quit => {
                self.should_quit = true;
                return;
            }
            Input::Previous => {
                let result = self.player.skip_previous_or_restart();
                self.settle(result);
                return;
            }
            Input::Next => {
                let result = self.player.skip_next();
                self.settle(result);
                return;
            }
            _ => {}
        }

        match self.nav.current() {
            Screen::MainMenu => self.handle_main_menu(input),
            Screen::Browse => self.handle_browse(input),
            Screen::NowPlaying => self.handle_now_playing(input, now),
            Screen::Settings => self.handle_settings(input),
            Screen::Sync => {
                if input == Input::Back {
                    self.sync.leave();
                    self.go_back();
                }
            }
        }
    }

    /// Once per frame.
    pub fn tick(&mut self, now: Instant) {
        if let Some(t) = self.transition.as_mut() {
            if !t.advance() {
                self.transition = None;
            }
        }

        if !self.volume_visible(now) {
            self.volume_shown_at = None;
        }

        let result = self.player.tick();
        self.report(result);

        if self.sync.poll() {
            self.browse.reload(&self.library);
        }
    }

    fn handle_main_menu(&mut self, input: Input) {
        let len = MenuAction::ALL.len();
        match input {
            Input::Up => self.menu_selected = step(self.menu_selected, len, false),
            Input::Down => self.menu_selected = step(self.menu_selected, len, true),
            Input::Enter => {
                let action = MenuAction::ALL[self.menu_selected.min(len - 1)];
                match action {
                    MenuAction::BrowseMusic => self.browse.open_root(&self.library),
                    MenuAction::ShowCurrentTrack => {}
                    MenuAction::Settings => self.settings_selected = 0,
                    MenuAction::SyncUsb => self.sync.enter(),
                }
                self.go_to(action.target());
            }
            _ => {}
        }
    }

    fn handle_browse(&mut self, input: Input) {
        match input {
            Input::Up => self.browse.select_prev(),
            Input::Down => self.browse.select_next(),
            Input::Enter => match self.browse.activate(&self.library) {
                Activation::Entered => self.slide(SlideDirection::Forward),
                Activation::Play { track, context } => {
                    let result = self.player.load_and_play(&track, context);
                    self.settle(result);
                }
                Activation::Nothing => {}
            },
            Input::Back => {
                if self.browse.back(&self.library) {
                    self.slide(SlideDirection::Back);
                } else {
                    self.go_back();
                }
            }
            _ => {}
        }
    }

    fn handle_now_playing(&mut self, input: Input, now: Instant) {
        match input {
            Input::Up => {
                self.player.volume_up(self.volume_step);
                self.volume_shown_at = Some(now);
            }
            Input::Down => {
                self.player.volume_down(self.volume_step);
                self.volume_shown_at = Some(now);
            }
            Input::Right => self.player.toggle_pause_resume(),
            Input::Back => self.go_back(),
            _ => {}
        }
    }

    fn handle_settings(&mut self, input: Input) {
        let len = SettingsItem::ALL.len();
        match input {
            Input::Up => self.settings_selected = step(self.settings_selected, len, false),
            Input::Down => self.settings_selected = step(self.settings_selected, len, true),
            Input::Enter => {
                let item = SettingsItem::ALL[self.settings_selected.min(len - 1)];
                match item {
                    SettingsItem::RepeatPlaylist => {
                        let on = !self.player.repeat_playlist();
                        self.player.set_repeat_playlist(on);
                        log::info!("repeat playlist: {}", on_off(on));
                    }
                    SettingsItem::DarkMode => {
                        self.dark_mode = !self.dark_mode;
                        log::info!("dark mode: {}", on_off(self.dark_mode));
                    }
                }
                self.save_toggles();
            }
            Input::Back => self.go_back(),
            _ => {}
        }
    }

    fn go_to(&mut self, screen: Screen) {
        self.nav.push(screen);
        self.slide(SlideDirection::Forward);
    }

    fn go_back(&mut self) {
        if self.nav.back() {
            self.slide(SlideDirection::Back);
        }
    }

    fn slide(&mut self, direction: SlideDirection) {
        self.transition = Transition::start(direction, self.transition_frames);
    }

    fn report<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        if let Err(e) = result {
            self.status = Some(e.to_string());
        }
    }

    fn settle<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        match result {
            Ok(()) => self.status = None,
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn save_toggles(&self) {
        let Some(path) = &self.state_path else {
            return;
        };
        let toggles = PersistedToggles {
            repeat_playlist: self.player.repeat_playlist(),
            dark_mode: self.dark_mode,
        };
        if let Err(e) = toggles.save_to(path) {
            log::warn!("failed to save settings to {}: {e}", path.display());
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
