//! Screens, menu items and the navigation stack between them.

/// Every screen the player can show.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Browse,
    NowPlaying,
    Settings,
    Sync,
}

/// Items of the main menu, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    BrowseMusic,
    ShowCurrentTrack,
    Settings,
    SyncUsb,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::BrowseMusic,
        MenuAction::ShowCurrentTrack,
        MenuAction::Settings,
        MenuAction::SyncUsb,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::BrowseMusic => "Browse Music",
            MenuAction::ShowCurrentTrack => "Show Current Track",
            MenuAction::Settings => "Settings",
            MenuAction::SyncUsb => "Sync USB",
        }
    }

    pub fn target(self) -> Screen {
        match self {
            MenuAction::BrowseMusic => Screen::Browse,
            MenuAction::ShowCurrentTrack => Screen::NowPlaying,
            MenuAction::Settings => Screen::Settings,
            MenuAction::SyncUsb => Screen::Sync,
        }
    }
}

/// Toggles on the settings screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SettingsItem {
    RepeatPlaylist,
    DarkMode,
}

impl SettingsItem {
    pub const ALL: [SettingsItem; 2] = [SettingsItem::RepeatPlaylist, SettingsItem::DarkMode];

    pub fn label(self) -> &'static str {
        match self {
            SettingsItem::RepeatPlaylist => "Repeat Playlist",
            SettingsItem::DarkMode => "Dark Mode",
        }
    }
}

/// Stack of screens; the main menu is always at the bottom.
#[derive(Debug)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::MainMenu],
        }
    }

    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::MainMenu)
    }

    pub fn push(&mut self, screen: Screen) {
        self.stack.push(screen);
    }

    /// Pop the top screen. Returns `false` at the main menu.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

/// Which way a slide moves: forward slides the new view in from the right,
/// back slides it in from the left.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlideDirection {
    Forward,
    Back,
}

/// A slide animation counted in frames.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub direction: SlideDirection,
    frame: u16,
    frames: u16,
}

impl Transition {
    /// `None` when slides are disabled.
    pub fn start(direction: SlideDirection, frames: u16) -> Option<Self> {
        (frames > 0).then_some(Self {
            direction,
            frame: 0,
            frames,
        })
    }

    /// Fraction of the width the incoming view is still offset by, 1.0 at
    /// the first frame down to 0.0 when done.
    pub fn remaining(&self) -> f32 {
        1.0 - f32::from(self.frame) / f32::from(self.frames)
    }

    /// Step one frame. Returns `false` once the slide has finished.
    pub fn advance(&mut self) -> bool {
        self.frame = (self.frame + 1).min(self.frames);
        self.frame < self.frames
    }
}

/// Move a wrapping list cursor one step.
pub(crate) fn step(selected: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (selected + 1) % len
    } else {
        (selected + len - 1) % len
    }
}
