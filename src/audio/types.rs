//! Playback session state and the small value types around it.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::LibrarySettings;
use crate::library::{self, Track};

/// Where the current track was picked from. The ordered track list is
/// recomputed from this every time it is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackContext {
    /// Tracks directly inside a folder.
    Folder(PathBuf),
    /// Every track under the library root.
    AllSongs(PathBuf),
}

impl PlaybackContext {
    /// Context of the folder containing `track`.
    pub fn folder_of(track: &Path) -> Self {
        Self::Folder(
            track
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        )
    }

    pub fn dir(&self) -> &Path {
        match self {
            Self::Folder(dir) | Self::AllSongs(dir) => dir,
        }
    }

    /// Re-scan the context's track order.
    pub fn tracks(&self, settings: &LibrarySettings) -> io::Result<Vec<PathBuf>> {
        match self {
            Self::Folder(dir) => library::folder_tracks(dir, settings),
            Self::AllSongs(root) => Ok(library::list_all(root, settings)),
        }
    }
}

/// "Now playing" state. Only `PlaybackController` mutates it.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    pub current: Option<Track>,
    pub is_playing: bool,
    pub context: Option<PlaybackContext>,
    /// Position of `current` within `context`; `None` while idle.
    pub index: Option<usize>,
}

/// Snapshot handed to the UI each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub elapsed: Duration,
    pub duration: Duration,
    pub playing: bool,
}
