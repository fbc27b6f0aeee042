//! Application module: the model the TUI draws and the runtime drives.
//!
//! `App` owns the navigation stack, browse and sync state and the playback
//! controller; key presses arrive as `Input` values.

mod browse;
mod model;
mod navigation;
mod sync_state;

pub use model::*;
pub use navigation::{MenuAction, Screen, SettingsItem, SlideDirection, Transition};
pub use sync_state::SyncStatus;
